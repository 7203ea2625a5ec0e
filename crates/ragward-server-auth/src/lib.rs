// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group-based authorization for knowledge bases.
//!
//! Users belong to groups; groups hold grants on knowledge bases; a user's
//! effective capabilities are the OR of their groups' grants, with admin
//! groups overriding everything. See [`resolve`] for the evaluation rules.

pub mod group;
pub mod middleware;
pub mod permission;
pub mod resolve;
pub mod token;
pub mod types;
pub mod user;

pub use group::{
	normalize_group_name, DefaultGroup, GroupMembership, GroupNameError, UserGroup,
	ADMIN_GROUP_DESCRIPTION, USER_GROUP_DESCRIPTION,
};
pub use middleware::{extract_bearer_token, AuthContext, AuthRequired, CurrentUser};
pub use permission::{KbAccess, KbPermission, KnowledgeBase};
pub use resolve::{PermissionSubject, ResolvedKbPermission, UNKNOWN_KB_NAME};
pub use token::{generate_access_token, hash_token, is_access_token, ACCESS_TOKEN_PREFIX};
pub use types::{GroupId, KbId, MembershipId, PermissionId, PermissionKind, UnknownPermissionKind, UserId};
pub use user::User;

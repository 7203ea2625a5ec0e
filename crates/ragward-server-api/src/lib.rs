// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types for the Ragward HTTP API, shared by the server and the client.

pub mod admin;
pub mod envelope;
pub mod groups;
pub mod health;
pub mod permissions;

pub use admin::{
	AdminUserResponse, KnowledgeBaseResponse, ListUsersParams, ListUsersResponse, DEFAULT_PAGE_SIZE,
	MAX_PAGE_SIZE,
};
pub use envelope::{ApiEnvelope, DeletedResponse, RbacErrorResponse};
pub use groups::{
	AddMemberRequest, CreateGroupRequest, GroupMemberResponse, GroupResponse, ListGroupsParams,
	MembershipResponse, UpdateGroupRequest,
};
pub use health::{HealthResponse, HealthStatus};
pub use permissions::{
	AccessibleKbsParams, AccessibleKbsResponse, KbAccessResponse, KbPermissionResponse,
	MyGroupResponse, MyKbPermissionResponse, MyPermissionsResponse, SetKbPermissionRequest,
	UpdateKbPermissionRequest,
};

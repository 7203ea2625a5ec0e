// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User group types and operations.
//!
//! This module provides:
//! - [`UserGroup`] - named collection of users sharing knowledge base grants
//! - [`GroupMembership`] - links users to groups
//! - [`DefaultGroup`] - the bootstrap groups every deployment carries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GroupId, MembershipId, UserId};

/// Description applied to the bootstrap admin group.
pub const ADMIN_GROUP_DESCRIPTION: &str = "Administrators have full access to all resources";

/// Description applied to the bootstrap default user group.
pub const USER_GROUP_DESCRIPTION: &str = "Default group for new users with minimal permissions";

/// A named group of users.
///
/// Membership in any group with `is_admin` set grants every permission on
/// every knowledge base. Both `is_admin` and `is_system` are fixed when the
/// group is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
	/// Unique identifier for this group.
	pub id: GroupId,

	/// Display name, unique among live groups.
	pub name: String,

	/// Free-form description shown to operators.
	pub description: Option<String>,

	/// Members of this group are administrators.
	pub is_admin: bool,

	/// Bootstrap group that must never be deleted.
	pub is_system: bool,

	/// When the group was created.
	pub created_at: DateTime<Utc>,

	/// When the group was last updated.
	pub updated_at: DateTime<Utc>,

	/// When the group was soft-deleted, if applicable.
	pub deleted_at: Option<DateTime<Utc>>,
}

impl UserGroup {
	/// Creates a new operator-defined group.
	pub fn new(name: impl Into<String>, description: Option<String>, is_admin: bool) -> Self {
		let now = Utc::now();
		Self {
			id: GroupId::generate(),
			name: name.into(),
			description,
			is_admin,
			is_system: false,
			created_at: now,
			updated_at: now,
			deleted_at: None,
		}
	}

	/// Creates a protected bootstrap group.
	pub fn system(name: impl Into<String>, description: impl Into<String>, is_admin: bool) -> Self {
		let mut group = Self::new(name, Some(description.into()), is_admin);
		group.is_system = true;
		group
	}

	/// Returns true if this group may not be deleted.
	///
	/// Protection follows the immutable flags and never the display name.
	pub fn is_protected(&self) -> bool {
		self.is_system || self.is_admin
	}

	/// Returns true if the group has not been soft-deleted.
	pub fn is_live(&self) -> bool {
		self.deleted_at.is_none()
	}
}

/// A user's membership in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
	/// Unique identifier for this membership record.
	pub id: MembershipId,

	/// The group this membership is for.
	pub group_id: GroupId,

	/// The user who is a member.
	pub user_id: UserId,

	/// When this membership was created.
	pub created_at: DateTime<Utc>,
}

impl GroupMembership {
	/// Creates a new group membership.
	pub fn new(group_id: GroupId, user_id: UserId) -> Self {
		Self {
			id: MembershipId::generate(),
			group_id,
			user_id,
			created_at: Utc::now(),
		}
	}
}

/// The groups created at startup when missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultGroup {
	/// Members have every permission on every knowledge base.
	Administrators,
	/// Every new user is enrolled here.
	Users,
}

impl DefaultGroup {
	/// Builds the group record for this default, using the configured name.
	pub fn build(self, name: &str) -> UserGroup {
		match self {
			DefaultGroup::Administrators => UserGroup::system(name, ADMIN_GROUP_DESCRIPTION, true),
			DefaultGroup::Users => UserGroup::system(name, USER_GROUP_DESCRIPTION, false),
		}
	}
}

/// Error returned by [`normalize_group_name`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupNameError {
	#[error("Group name cannot be empty")]
	Empty,
	#[error("Group name must be at most {max} characters")]
	TooLong { max: usize },
}

/// Maximum length of a group name, in characters.
pub const MAX_GROUP_NAME_LEN: usize = 128;

/// Trims a requested group name and rejects empty or oversized names.
pub fn normalize_group_name(raw: &str) -> Result<String, GroupNameError> {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return Err(GroupNameError::Empty);
	}
	if trimmed.chars().count() > MAX_GROUP_NAME_LEN {
		return Err(GroupNameError::TooLong {
			max: MAX_GROUP_NAME_LEN,
		});
	}
	Ok(trimmed.to_string())
}

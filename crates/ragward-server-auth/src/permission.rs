// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Knowledge base grants.
//!
//! A [`KbPermission`] binds one group to one knowledge base with four
//! independent booleans ([`KbAccess`]). There is no implication between the
//! booleans: update does not imply read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GroupId, KbId, PermissionId, PermissionKind};

/// The four capabilities on a knowledge base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KbAccess {
	pub can_read: bool,
	pub can_update: bool,
	pub can_delete: bool,
	pub can_create: bool,
}

impl KbAccess {
	/// No capabilities. Used whenever the answer is unknown.
	pub const fn deny() -> Self {
		Self {
			can_read: false,
			can_update: false,
			can_delete: false,
			can_create: false,
		}
	}

	/// Every capability.
	pub const fn full() -> Self {
		Self {
			can_read: true,
			can_update: true,
			can_delete: true,
			can_create: true,
		}
	}

	/// Combines two grants; a capability held by either side is kept.
	pub fn merge(self, other: KbAccess) -> Self {
		Self {
			can_read: self.can_read || other.can_read,
			can_update: self.can_update || other.can_update,
			can_delete: self.can_delete || other.can_delete,
			can_create: self.can_create || other.can_create,
		}
	}

	/// Returns true if the given capability is held.
	pub fn allows(&self, kind: PermissionKind) -> bool {
		match kind {
			PermissionKind::Read => self.can_read,
			PermissionKind::Update => self.can_update,
			PermissionKind::Delete => self.can_delete,
			PermissionKind::Create => self.can_create,
		}
	}

	/// Returns true if no capability is held.
	pub fn is_empty(&self) -> bool {
		*self == Self::deny()
	}
}

/// A group's grant on a knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbPermission {
	pub id: PermissionId,
	pub group_id: GroupId,
	pub kb_id: KbId,
	#[serde(flatten)]
	pub access: KbAccess,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl KbPermission {
	pub fn new(group_id: GroupId, kb_id: KbId, access: KbAccess) -> Self {
		let now = Utc::now();
		Self {
			id: PermissionId::generate(),
			group_id,
			kb_id,
			access,
			created_at: now,
			updated_at: now,
		}
	}
}

/// A document collection owned by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
	pub id: KbId,
	pub name: String,
	pub created_at: DateTime<Utc>,
	pub deleted_at: Option<DateTime<Utc>>,
}

impl KnowledgeBase {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			id: KbId::generate(),
			name: name.into(),
			created_at: Utc::now(),
			deleted_at: None,
		}
	}
}

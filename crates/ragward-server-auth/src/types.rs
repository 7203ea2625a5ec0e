// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for group-based authorization.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for each entity
//!   ([`UserId`], [`GroupId`], [`KbId`], ...) preventing accidental mixing
//! - **Permission kinds**: The four independent capabilities a group can hold
//!   on a knowledge base ([`PermissionKind`])
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(GroupId, "Unique identifier for a user group.");
define_id_type!(MembershipId, "Unique identifier for a group membership.");
define_id_type!(KbId, "Unique identifier for a knowledge base.");
define_id_type!(PermissionId, "Unique identifier for a group's grant on a knowledge base.");

// =============================================================================
// Permission Kinds
// =============================================================================

/// One of the four independent capabilities on a knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
	Read,
	Update,
	Delete,
	Create,
}

impl PermissionKind {
	/// Returns all permission kinds.
	pub fn all() -> &'static [PermissionKind] {
		&[
			PermissionKind::Read,
			PermissionKind::Update,
			PermissionKind::Delete,
			PermissionKind::Create,
		]
	}
}

impl Default for PermissionKind {
	fn default() -> Self {
		PermissionKind::Read
	}
}

impl fmt::Display for PermissionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PermissionKind::Read => write!(f, "read"),
			PermissionKind::Update => write!(f, "update"),
			PermissionKind::Delete => write!(f, "delete"),
			PermissionKind::Create => write!(f, "create"),
		}
	}
}

/// Error returned when parsing an unknown permission kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission kind: {0}")]
pub struct UnknownPermissionKind(pub String);

impl FromStr for PermissionKind {
	type Err = UnknownPermissionKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"read" => Ok(PermissionKind::Read),
			"update" => Ok(PermissionKind::Update),
			"delete" => Ok(PermissionKind::Delete),
			"create" => Ok(PermissionKind::Create),
			other => Err(UnknownPermissionKind(other.to_string())),
		}
	}
}

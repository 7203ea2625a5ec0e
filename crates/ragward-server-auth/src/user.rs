// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User records as seen by the authorization service.
//!
//! Accounts are owned by the host application; this service keeps the
//! columns needed to render membership lists and authenticate API calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Unique identifier for this user.
	pub id: UserId,

	/// Login email address.
	pub email: String,

	/// Display name.
	pub nickname: String,

	/// URL to the user's avatar image.
	pub avatar_url: Option<String>,

	/// When the user was created.
	pub created_at: DateTime<Utc>,

	/// When the user was last updated.
	pub updated_at: DateTime<Utc>,

	/// When the user was soft-deleted, if applicable.
	pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
	pub fn new(email: impl Into<String>, nickname: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: UserId::generate(),
			email: email.into(),
			nickname: nickname.into(),
			avatar_url: None,
			created_at: now,
			updated_at: now,
			deleted_at: None,
		}
	}

	/// Returns true if the user has not been soft-deleted.
	pub fn is_active(&self) -> bool {
		self.deleted_at.is_none()
	}

	/// Case-insensitive match on email or nickname.
	pub fn matches_search(&self, needle: &str) -> bool {
		let needle = needle.to_lowercase();
		self.email.to_lowercase().contains(&needle) || self.nickname.to_lowercase().contains(&needle)
	}
}

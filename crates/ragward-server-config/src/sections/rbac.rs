// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group and permission settings.

use serde::Deserialize;

/// Resolved RBAC settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RbacConfig {
	/// Mounts the user and knowledge base administration routes.
	pub enterprise: bool,
	/// Name given to the admin group when it is first created.
	pub admin_group_name: String,
	/// Name given to the default user group when it is first created.
	pub user_group_name: String,
	/// Enroll users without any group into the default group at startup.
	pub enroll_existing_users: bool,
}

impl Default for RbacConfig {
	fn default() -> Self {
		Self {
			enterprise: false,
			admin_group_name: "Administrators".to_string(),
			user_group_name: "Users".to_string(),
			enroll_existing_users: true,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RbacConfigLayer {
	#[serde(default)]
	pub enterprise: Option<bool>,
	#[serde(default)]
	pub admin_group_name: Option<String>,
	#[serde(default)]
	pub user_group_name: Option<String>,
	#[serde(default)]
	pub enroll_existing_users: Option<bool>,
}

impl RbacConfigLayer {
	pub fn merge(&mut self, other: RbacConfigLayer) {
		if other.enterprise.is_some() {
			self.enterprise = other.enterprise;
		}
		if other.admin_group_name.is_some() {
			self.admin_group_name = other.admin_group_name;
		}
		if other.user_group_name.is_some() {
			self.user_group_name = other.user_group_name;
		}
		if other.enroll_existing_users.is_some() {
			self.enroll_existing_users = other.enroll_existing_users;
		}
	}

	pub fn finalize(self) -> RbacConfig {
		let defaults = RbacConfig::default();
		RbacConfig {
			enterprise: self.enterprise.unwrap_or(defaults.enterprise),
			admin_group_name: self
				.admin_group_name
				.map(|s| s.trim().to_string())
				.unwrap_or(defaults.admin_group_name),
			user_group_name: self
				.user_group_name
				.map(|s| s.trim().to_string())
				.unwrap_or(defaults.user_group_name),
			enroll_existing_users: self
				.enroll_existing_users
				.unwrap_or(defaults.enroll_existing_users),
		}
	}
}

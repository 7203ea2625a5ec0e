// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

use crate::permissions::MyGroupResponse;

/// Default page size for user listings.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest accepted page size for user listings.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A user in admin API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminUserResponse {
	pub id: Uuid,
	pub email: String,
	pub nickname: String,
	pub avatar_url: Option<String>,
	pub is_admin: bool,
	pub groups: Vec<MyGroupResponse>,
	pub created_at: DateTime<Utc>,
}

/// Paginated list of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListUsersResponse {
	pub users: Vec<AdminUserResponse>,
	pub total: i64,
	pub page: u32,
	pub page_size: u32,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListUsersParams {
	#[serde(default = "default_page")]
	pub page: u32,
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search: Option<String>,
}

impl Default for ListUsersParams {
	fn default() -> Self {
		Self {
			page: default_page(),
			page_size: default_page_size(),
			search: None,
		}
	}
}

impl ListUsersParams {
	/// Page number, at least 1.
	pub fn page_clamped(&self) -> u32 {
		self.page.max(1)
	}

	/// Page size between 1 and [`MAX_PAGE_SIZE`].
	pub fn page_size_clamped(&self) -> u32 {
		self.page_size.clamp(1, MAX_PAGE_SIZE)
	}

	pub fn offset(&self) -> i64 {
		i64::from(self.page_clamped() - 1) * i64::from(self.page_size_clamped())
	}
}

fn default_page() -> u32 {
	1
}

fn default_page_size() -> u32 {
	DEFAULT_PAGE_SIZE
}

/// A knowledge base known to the authorization service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct KnowledgeBaseResponse {
	pub id: Uuid,
	pub name: String,
	pub created_at: DateTime<Utc>,
}

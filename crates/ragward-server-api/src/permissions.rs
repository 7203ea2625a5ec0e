// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// A group's grant on a knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct KbPermissionResponse {
	pub id: Uuid,
	pub group_id: Uuid,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub group_name: Option<String>,
	pub kb_id: Uuid,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub kb_name: Option<String>,
	pub can_read: bool,
	pub can_update: bool,
	pub can_delete: bool,
	pub can_create: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Create or overwrite a grant. Omitted booleans are false.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SetKbPermissionRequest {
	pub group_id: Uuid,
	pub kb_id: Uuid,
	#[serde(default)]
	pub can_read: bool,
	#[serde(default)]
	pub can_update: bool,
	#[serde(default)]
	pub can_delete: bool,
	#[serde(default)]
	pub can_create: bool,
}

/// Partial update; omitted booleans keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateKbPermissionRequest {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub can_read: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub can_update: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub can_delete: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub can_create: Option<bool>,
}

/// A group the caller belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MyGroupResponse {
	pub id: Uuid,
	pub name: String,
	pub is_admin: bool,
}

/// The caller's resolved capabilities on one knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MyKbPermissionResponse {
	pub kb_id: Uuid,
	pub kb_name: String,
	pub can_read: bool,
	pub can_update: bool,
	pub can_delete: bool,
	pub can_create: bool,
}

/// Everything the caller may do, resolved across all their groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MyPermissionsResponse {
	pub user_id: Uuid,
	pub is_admin: bool,
	pub groups: Vec<MyGroupResponse>,
	pub kb_permissions: Vec<MyKbPermissionResponse>,
}

impl MyPermissionsResponse {
	/// The resolved row for a knowledge base, if any.
	pub fn kb(&self, kb_id: Uuid) -> Option<&MyKbPermissionResponse> {
		self.kb_permissions.iter().find(|p| p.kb_id == kb_id)
	}
}

/// The caller's capabilities on a single knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct KbAccessResponse {
	pub kb_id: Uuid,
	pub is_admin: bool,
	pub can_read: bool,
	pub can_update: bool,
	pub can_delete: bool,
	pub can_create: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AccessibleKbsParams {
	/// One of `read`, `update`, `delete`, `create`. Defaults to `read`.
	#[serde(default)]
	pub permission: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccessibleKbsResponse {
	pub permission: String,
	pub kb_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_request_defaults_to_no_capabilities() {
		let body = serde_json::json!({
			"group_id": Uuid::new_v4(),
			"kb_id": Uuid::new_v4(),
			"can_read": true,
		});
		let req: SetKbPermissionRequest = serde_json::from_value(body).unwrap();
		assert!(req.can_read);
		assert!(!req.can_update && !req.can_delete && !req.can_create);
	}

	#[test]
	fn my_permissions_lookup_by_kb() {
		let kb_id = Uuid::new_v4();
		let perms = MyPermissionsResponse {
			user_id: Uuid::new_v4(),
			is_admin: false,
			groups: vec![],
			kb_permissions: vec![MyKbPermissionResponse {
				kb_id,
				kb_name: "manuals".to_string(),
				can_read: true,
				can_update: false,
				can_delete: false,
				can_create: false,
			}],
		};
		assert!(perms.kb(kb_id).is_some());
		assert!(perms.kb(Uuid::new_v4()).is_none());
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Path and query parameter parsing shared by handlers.

use std::str::FromStr;

use ragward_server_auth::{normalize_group_name, PermissionKind};

use crate::error::ServerError;

/// Parse a path segment into a typed ID.
///
/// `what` names the entity in the error message ("group", "user", ...).
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ServerError> {
	raw
		.trim()
		.parse()
		.map_err(|_| ServerError::BadRequest(format!("Invalid {what} ID: {raw}")))
}

/// Parse an optional `permission` query value, defaulting to read.
pub fn parse_permission_kind(raw: Option<&str>) -> Result<PermissionKind, ServerError> {
	match raw {
		None => Ok(PermissionKind::default()),
		Some(value) if value.trim().is_empty() => Ok(PermissionKind::default()),
		Some(value) => value
			.parse()
			.map_err(|e: ragward_server_auth::UnknownPermissionKind| ServerError::BadRequest(e.to_string())),
	}
}

/// Trim and validate a group name from a request body.
pub fn validate_group_name(raw: &str) -> Result<String, ServerError> {
	normalize_group_name(raw).map_err(|e| ServerError::BadRequest(e.to_string()))
}

/// Trim an optional description, treating blank text as absent.
pub fn normalize_description(raw: Option<String>) -> Option<String> {
	raw
		.map(|d| d.trim().to_string())
		.filter(|d| !d.is_empty())
}

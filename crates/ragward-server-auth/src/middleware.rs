// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication context extracted from requests.
//!
//! This module provides:
//! - [`CurrentUser`] - authenticated user plus their resolved permissions
//! - [`AuthContext`] - auth state for request processing
//! - [`extract_bearer_token`] - reads the `Authorization` header
//!
//! Token values are never logged.

use http::header::AUTHORIZATION;
use http::HeaderMap;

use crate::resolve::PermissionSubject;
use crate::types::UserId;
use crate::user::User;

/// The currently authenticated user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
	/// The authenticated user.
	pub user: User,
	/// Groups and grants loaded for this request.
	pub subject: PermissionSubject,
}

impl CurrentUser {
	pub fn new(user: User, subject: PermissionSubject) -> Self {
		Self { user, subject }
	}

	pub fn id(&self) -> UserId {
		self.user.id
	}

	/// Returns true if the user belongs to any admin group.
	pub fn is_admin(&self) -> bool {
		self.subject.is_admin()
	}
}

/// Authentication context for request processing.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	/// The current user, if authenticated.
	pub current_user: Option<CurrentUser>,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self { current_user: None }
	}

	/// Create a new authenticated context.
	pub fn authenticated(current_user: CurrentUser) -> Self {
		Self {
			current_user: Some(current_user),
		}
	}

	/// Get the current user, if authenticated.
	pub fn user(&self) -> Option<&CurrentUser> {
		self.current_user.as_ref()
	}

	/// Require authentication, returning the current user or an error.
	pub fn require_user(&self) -> Result<&CurrentUser, AuthRequired> {
		self.current_user.as_ref().ok_or(AuthRequired)
	}
}

/// Error returned when authentication is required but not present.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("authentication required")]
pub struct AuthRequired;

/// Extract a bearer token from the `Authorization` header.
///
/// Returns `None` when the header is missing, not valid UTF-8, not a
/// `Bearer` credential, or empty.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(|token| token.to_string())
}

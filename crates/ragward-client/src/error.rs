// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Ragward client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the permissions API.
#[derive(Debug, Error)]
pub enum ClientError {
	/// Invalid or missing auth token.
	#[error("invalid or missing auth token")]
	InvalidAuthToken,

	/// Invalid or missing base URL.
	#[error("invalid or missing base URL")]
	InvalidBaseUrl,

	/// 401: the token is missing, unknown or revoked.
	#[error("unauthorized: {0}")]
	Unauthorized(String),

	/// 403: authenticated but not allowed.
	#[error("forbidden: {0}")]
	Forbidden(String),

	/// 404
	#[error("not found: {0}")]
	NotFound(String),

	/// 409
	#[error("conflict: {0}")]
	Conflict(String),

	/// Any other non-success status.
	#[error("server error (HTTP {status}): {message}")]
	Server { status: u16, message: String },

	/// A success response without a `data` field.
	#[error("response did not contain data")]
	MissingData,

	/// Refused locally: default and admin groups cannot be deleted.
	#[error("group '{name}' is protected and cannot be deleted")]
	ProtectedGroup { name: String },

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl ClientError {
	/// Build the error for a non-success status and the server's message.
	pub fn from_status(status: u16, message: String) -> Self {
		match status {
			401 => ClientError::Unauthorized(message),
			403 => ClientError::Forbidden(message),
			404 => ClientError::NotFound(message),
			409 => ClientError::Conflict(message),
			_ => ClientError::Server { status, message },
		}
	}

	/// The server's human-readable message, when the error came from a response.
	pub fn server_message(&self) -> Option<&str> {
		match self {
			ClientError::Unauthorized(m)
			| ClientError::Forbidden(m)
			| ClientError::NotFound(m)
			| ClientError::Conflict(m)
			| ClientError::Server { message: m, .. } => Some(m),
			_ => None,
		}
	}
}

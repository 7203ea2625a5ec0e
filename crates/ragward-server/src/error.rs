// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::response::{IntoResponse, Response};
use ragward_server_api::RbacErrorResponse;
use ragward_server_db::DbError;

use crate::api_response::{bad_request, conflict, forbidden, internal_error, not_found, unauthorized};

/// Errors surfaced by RBAC handlers.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Database operation failed.
	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	/// Invalid request payload or parameter.
	#[error("Invalid request: {0}")]
	BadRequest(String),

	#[error("Unauthorized: {0}")]
	Unauthorized(String),

	/// Authenticated, but not allowed.
	#[error("Forbidden: {0}")]
	Forbidden(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match self {
			ServerError::Db(DbError::NotFound(message)) => {
				not_found::<RbacErrorResponse>(message).into_response()
			}
			ServerError::Db(DbError::Conflict(message)) => {
				conflict::<RbacErrorResponse>("conflict", message).into_response()
			}
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				internal_error::<RbacErrorResponse>("A database error occurred").into_response()
			}
			ServerError::NotFound(message) => not_found::<RbacErrorResponse>(message).into_response(),
			ServerError::Conflict(message) => {
				conflict::<RbacErrorResponse>("conflict", message).into_response()
			}
			ServerError::BadRequest(message) => {
				bad_request::<RbacErrorResponse>("bad_request", message).into_response()
			}
			ServerError::Unauthorized(message) => {
				unauthorized::<RbacErrorResponse>("unauthorized", message).into_response()
			}
			ServerError::Forbidden(message) => {
				forbidden::<RbacErrorResponse>("forbidden", message).into_response()
			}
			ServerError::Internal(message) => {
				tracing::error!(%message, "internal error");
				internal_error::<RbacErrorResponse>("An internal error occurred").into_response()
			}
		}
	}
}

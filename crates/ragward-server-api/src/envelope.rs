// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Response envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Successful response body: the payload lives under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	pub data: T,
}

impl<T> ApiEnvelope<T> {
	pub fn new(data: T) -> Self {
		Self {
			message: None,
			data,
		}
	}

	pub fn with_message(data: T, message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
			data,
		}
	}
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RbacErrorResponse {
	pub error: String,
	pub message: String,
}

/// Body of a successful delete or removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DeletedResponse {
	pub deleted: bool,
}

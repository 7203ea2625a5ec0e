// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Ragward.
//!
//! Every outbound client carries the same `ragward/{version}` User-Agent so
//! server logs can tell the CLI and SDK apart from browsers.

mod client;

pub use client::{
	builder, builder_with_user_agent, new_client, new_client_with_timeout, user_agent,
	DEFAULT_TIMEOUT,
};

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client SDK for the Ragward permissions API.
//!
//! - [`RbacClient`]: one method per HTTP operation, typed errors, no retries
//! - [`PermissionCache`]: the caller's resolved permissions with a fixed
//!   stale window and default-deny lookups
//! - [`filter`]: the fuzzy text filter used by admin listings

pub mod client;
pub mod error;
pub mod filter;
pub mod permissions;

pub use client::{RbacClient, RbacClientBuilder};
pub use error::{ClientError, Result};
pub use permissions::{CacheState, PermissionCache, DEFAULT_STALE_AFTER};

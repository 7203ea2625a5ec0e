// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer access tokens.
//!
//! Tokens are handed to the user once and only their SHA-256 digest is
//! stored.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Prefix identifying a Ragward access token.
pub const ACCESS_TOKEN_PREFIX: &str = "rw_";

const TOKEN_BYTES: usize = 32;

/// Generates a fresh access token (`rw_` followed by 64 hex characters).
pub fn generate_access_token() -> String {
	let mut bytes = [0u8; TOKEN_BYTES];
	rand::thread_rng().fill_bytes(&mut bytes);
	format!("{ACCESS_TOKEN_PREFIX}{}", hex::encode(bytes))
}

/// Hex-encoded SHA-256 digest used to look a token up.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}

/// Check if a token looks like an access token.
pub fn is_access_token(token: &str) -> bool {
	token.starts_with(ACCESS_TOKEN_PREFIX)
}

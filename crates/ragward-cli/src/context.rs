// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::Context;
use ragward_client::RbacClient;

/// Settings shared by every subcommand.
pub struct CliContext {
	pub server_url: String,
	token: Option<String>,
	pub json: bool,
}

impl CliContext {
	pub fn new(server_url: String, token: Option<String>, json: bool) -> Self {
		Self {
			server_url,
			token,
			json,
		}
	}

	pub fn client(&self) -> anyhow::Result<RbacClient> {
		let token = self
			.token
			.as_deref()
			.context("no token: pass --token or set RAGWARD_TOKEN")?;
		let client = RbacClient::builder()
			.base_url(&self.server_url)
			.auth_token(token)
			.build()
			.with_context(|| format!("cannot create client for {}", self.server_url))?;
		Ok(client)
	}
}

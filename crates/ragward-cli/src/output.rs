// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use console::{style, StyledObject};
use ragward_client::ClientError;
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

pub fn success(message: impl std::fmt::Display) {
	println!("{} {}", style("✓").green().bold(), message);
}

/// Yes/no cell for permission tables.
pub fn flag(value: bool) -> StyledObject<&'static str> {
	if value {
		style("yes").green()
	} else {
		style("no").dim()
	}
}

/// Text shown for a failed command: the server's message when there is one.
pub fn error_text(err: &anyhow::Error) -> String {
	if let Some(message) = err
		.downcast_ref::<ClientError>()
		.and_then(ClientError::server_message)
	{
		return message.to_string();
	}
	format!("{err:#}")
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `ragward`: manage groups, memberships and knowledge base permissions.

mod commands;
mod context;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use commands::{admin, groups, me, permissions};
use context::CliContext;

#[derive(Debug, Parser)]
#[command(name = "ragward", version, about = "Manage Ragward groups and knowledge base permissions")]
struct Cli {
	/// Ragward server URL
	#[arg(long, global = true, env = "RAGWARD_URL", default_value = "http://localhost:8080")]
	server_url: String,

	/// Bearer token
	#[arg(long, global = true, env = "RAGWARD_TOKEN", hide_env_values = true)]
	token: Option<String>,

	/// Print JSON instead of tables
	#[arg(long, global = true)]
	json: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Manage groups and their members
	#[command(subcommand)]
	Groups(groups::GroupsCommands),
	/// Manage knowledge base grants
	#[command(subcommand)]
	Permissions(permissions::PermissionsCommands),
	/// Inspect your own permissions
	#[command(subcommand)]
	Me(me::MeCommands),
	/// Enterprise admin screens
	#[command(subcommand)]
	Admin(admin::AdminCommands),
}

fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let ctx = CliContext::new(cli.server_url, cli.token, cli.json);

	match cli.command {
		Commands::Groups(cmd) => groups::handle(cmd, &ctx).await,
		Commands::Permissions(cmd) => permissions::handle(cmd, &ctx).await,
		Commands::Me(cmd) => me::handle(cmd, &ctx).await,
		Commands::Admin(cmd) => admin::handle(cmd, &ctx).await,
	}
}

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing();

	match run(cli).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("{} {}", style("✗").red().bold(), output::error_text(&e));
			ExitCode::FAILURE
		}
	}
}

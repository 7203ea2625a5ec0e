// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use clap::{Args, Subcommand};
use console::style;
use ragward_client::PermissionCache;
use ragward_server_auth::PermissionKind;
use tracing::instrument;
use uuid::Uuid;

use crate::context::CliContext;
use crate::output::{flag, print_json};

#[derive(Debug, Subcommand)]
pub enum MeCommands {
	/// Show your groups and resolved knowledge base permissions
	Permissions,
	/// Show your access to one knowledge base
	Kb(KbArgs),
	/// List knowledge bases you can access
	Accessible(AccessibleArgs),
	/// Check that you can read every listed knowledge base
	Check(CheckArgs),
}

#[derive(Debug, Clone, Args)]
pub struct KbArgs {
	pub kb_id: Uuid,
}

#[derive(Debug, Clone, Args)]
pub struct AccessibleArgs {
	/// read, update, delete or create
	#[arg(long)]
	pub kind: Option<PermissionKind>,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
	#[arg(required = true)]
	pub kb_ids: Vec<Uuid>,
}

pub async fn handle(cmd: MeCommands, ctx: &CliContext) -> anyhow::Result<()> {
	match cmd {
		MeCommands::Permissions => handle_permissions(ctx).await,
		MeCommands::Kb(args) => handle_kb(args, ctx).await,
		MeCommands::Accessible(args) => handle_accessible(args, ctx).await,
		MeCommands::Check(args) => handle_check(args, ctx).await,
	}
}

#[instrument(skip(ctx))]
async fn handle_permissions(ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let mine = client.my_permissions().await?;

	if ctx.json {
		return print_json(&mine);
	}

	println!("User:   {}", style(mine.user_id).cyan());
	println!("Admin:  {}", flag(mine.is_admin));
	let groups: Vec<_> = mine.groups.iter().map(|g| g.name.as_str()).collect();
	println!("Groups: {}", if groups.is_empty() { "-".to_string() } else { groups.join(", ") });
	println!();

	if mine.kb_permissions.is_empty() {
		println!("No knowledge base access");
		return Ok(());
	}

	println!(
		"{:<38} {:<24} {:<6} {:<6} {:<6} {}",
		style("KB ID").bold().underlined(),
		style("NAME").bold().underlined(),
		style("READ").bold().underlined(),
		style("UPDATE").bold().underlined(),
		style("DELETE").bold().underlined(),
		style("CREATE").bold().underlined()
	);
	for kb in &mine.kb_permissions {
		println!(
			"{:<38} {:<24} {:<6} {:<6} {:<6} {}",
			kb.kb_id,
			kb.kb_name,
			flag(kb.can_read),
			flag(kb.can_update),
			flag(kb.can_delete),
			flag(kb.can_create)
		);
	}
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_kb(args: KbArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let access = client.my_kb_access(args.kb_id).await?;

	if ctx.json {
		return print_json(&access);
	}

	println!("Knowledge base: {}", style(access.kb_id).cyan());
	if access.is_admin {
		println!("  {}", style("admin: full access").red());
	}
	println!("  Read:   {}", flag(access.can_read));
	println!("  Update: {}", flag(access.can_update));
	println!("  Delete: {}", flag(access.can_delete));
	println!("  Create: {}", flag(access.can_create));
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_accessible(args: AccessibleArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let accessible = client.accessible_kbs(args.kind).await?;

	if ctx.json {
		return print_json(&accessible);
	}

	if accessible.kb_ids.is_empty() {
		println!("No knowledge bases with {} access", accessible.permission);
		return Ok(());
	}

	println!("{}", style(format!("{} access:", accessible.permission)).bold());
	for kb_id in accessible.kb_ids {
		println!("  {kb_id}");
	}
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_check(args: CheckArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let cache = PermissionCache::new(ctx.client()?);
	cache.load().await?;

	let readable = cache.can_access_all_kbs(&args.kb_ids);

	if ctx.json {
		let per_kb: Vec<_> = args
			.kb_ids
			.iter()
			.map(|id| serde_json::json!({ "kb_id": id, "can_read": cache.kb_access(*id).can_read }))
			.collect();
		return print_json(&serde_json::json!({ "all_readable": readable, "kbs": per_kb }));
	}

	for id in &args.kb_ids {
		println!("{:<38} {}", id, flag(cache.kb_access(*id).can_read));
	}
	if !readable {
		anyhow::bail!("not every knowledge base is readable");
	}
	Ok(())
}

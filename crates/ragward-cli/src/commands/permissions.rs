// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use clap::{Args, Subcommand};
use console::style;
use ragward_client::filter::fuzzy_filter;
use ragward_server_api::{SetKbPermissionRequest, UpdateKbPermissionRequest};
use tracing::instrument;
use uuid::Uuid;

use crate::context::CliContext;
use crate::output::{flag, print_json, success};

#[derive(Debug, Subcommand)]
pub enum PermissionsCommands {
	/// List the grants on a knowledge base
	List(ListArgs),
	/// Grant a group access to a knowledge base, replacing any existing grant
	Set(SetArgs),
	/// Change individual flags on an existing grant
	Update(UpdateArgs),
	/// Remove a grant
	Delete(DeleteArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
	#[arg(long)]
	pub kb: Uuid,

	/// Fuzzy filter on group and knowledge base name
	#[arg(long)]
	pub filter: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SetArgs {
	#[arg(long)]
	pub group: Uuid,

	#[arg(long)]
	pub kb: Uuid,

	#[arg(long)]
	pub read: bool,

	#[arg(long)]
	pub update: bool,

	#[arg(long)]
	pub delete: bool,

	#[arg(long)]
	pub create: bool,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
	pub permission_id: Uuid,

	#[arg(long)]
	pub read: Option<bool>,

	#[arg(long)]
	pub update: Option<bool>,

	#[arg(long)]
	pub delete: Option<bool>,

	#[arg(long)]
	pub create: Option<bool>,
}

impl UpdateArgs {
	fn is_empty(&self) -> bool {
		self.read.is_none() && self.update.is_none() && self.delete.is_none() && self.create.is_none()
	}
}

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
	pub permission_id: Uuid,
}

pub async fn handle(cmd: PermissionsCommands, ctx: &CliContext) -> anyhow::Result<()> {
	match cmd {
		PermissionsCommands::List(args) => handle_list(args, ctx).await,
		PermissionsCommands::Set(args) => handle_set(args, ctx).await,
		PermissionsCommands::Update(args) => handle_update(args, ctx).await,
		PermissionsCommands::Delete(args) => handle_delete(args, ctx).await,
	}
}

#[instrument(skip(ctx))]
async fn handle_list(args: ListArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let rows = client.list_kb_permissions(args.kb).await?;

	let kb_name = if args.filter.is_some() {
		let mine = client.my_permissions().await?;
		mine.kb(args.kb).map(|p| p.kb_name.clone()).unwrap_or_default()
	} else {
		String::new()
	};

	let rows = fuzzy_filter(&rows, args.filter.as_deref().unwrap_or(""), |p| {
		format!("{} {}", p.group_name.as_deref().unwrap_or_default(), kb_name)
	});

	if ctx.json {
		return print_json(&rows);
	}

	if rows.is_empty() {
		println!("No grants on knowledge base {}", args.kb);
		return Ok(());
	}

	println!(
		"{:<38} {:<24} {:<6} {:<6} {:<6} {}",
		style("ID").bold().underlined(),
		style("GROUP").bold().underlined(),
		style("READ").bold().underlined(),
		style("UPDATE").bold().underlined(),
		style("DELETE").bold().underlined(),
		style("CREATE").bold().underlined()
	);
	for row in rows {
		println!(
			"{:<38} {:<24} {:<6} {:<6} {:<6} {}",
			row.id,
			row.group_name.as_deref().unwrap_or("-"),
			flag(row.can_read),
			flag(row.can_update),
			flag(row.can_delete),
			flag(row.can_create)
		);
	}
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_set(args: SetArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let grant = client
		.set_kb_permission(&SetKbPermissionRequest {
			group_id: args.group,
			kb_id: args.kb,
			can_read: args.read,
			can_update: args.update,
			can_delete: args.delete,
			can_create: args.create,
		})
		.await?;

	if ctx.json {
		return print_json(&grant);
	}

	success(format!(
		"Grant {} saved for group {}",
		style(grant.id).cyan(),
		grant.group_name.as_deref().unwrap_or("-")
	));
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_update(args: UpdateArgs, ctx: &CliContext) -> anyhow::Result<()> {
	if args.is_empty() {
		anyhow::bail!("nothing to update: pass at least one of --read, --update, --delete, --create");
	}

	let client = ctx.client()?;
	let grant = client
		.update_kb_permission(
			args.permission_id,
			&UpdateKbPermissionRequest {
				can_read: args.read,
				can_update: args.update,
				can_delete: args.delete,
				can_create: args.create,
			},
		)
		.await?;

	if ctx.json {
		return print_json(&grant);
	}

	success(format!("Grant {} updated", style(grant.id).cyan()));
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_delete(args: DeleteArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	client.delete_kb_permission(args.permission_id).await?;

	if ctx.json {
		return print_json(&serde_json::json!({ "deleted": true }));
	}

	success(format!("Grant {} deleted", args.permission_id));
	Ok(())
}

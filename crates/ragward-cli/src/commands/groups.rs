// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;
use ragward_client::filter::fuzzy_filter;
use ragward_server_api::{CreateGroupRequest, UpdateGroupRequest};
use tracing::instrument;
use uuid::Uuid;

use crate::context::CliContext;
use crate::output::{flag, print_json, success};

#[derive(Debug, Subcommand)]
pub enum GroupsCommands {
	/// List groups
	List(ListArgs),
	/// Create a group
	Create(CreateArgs),
	/// Rename a group or change its description
	Update(UpdateArgs),
	/// Delete a group (default and admin groups are refused)
	Delete(GroupArgs),
	/// List the members of a group
	Members(GroupArgs),
	/// Add a user to a group
	AddMember(MemberArgs),
	/// Remove a user from a group
	RemoveMember(MemberArgs),
	/// List the knowledge base grants a group holds
	Permissions(GroupArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
	/// List every group (admins only) instead of your own
	#[arg(long)]
	pub all: bool,

	/// Fuzzy filter on the group name
	#[arg(long)]
	pub filter: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
	#[arg(long)]
	pub name: String,

	#[arg(long)]
	pub description: Option<String>,

	/// Members of an admin group bypass every knowledge base check
	#[arg(long)]
	pub admin: bool,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
	pub group_id: Uuid,

	#[arg(long)]
	pub name: Option<String>,

	/// New description; pass an empty string to clear it
	#[arg(long)]
	pub description: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct GroupArgs {
	pub group_id: Uuid,
}

#[derive(Debug, Clone, Args)]
pub struct MemberArgs {
	pub group_id: Uuid,
	pub user_id: Uuid,
}

pub async fn handle(cmd: GroupsCommands, ctx: &CliContext) -> anyhow::Result<()> {
	match cmd {
		GroupsCommands::List(args) => handle_list(args, ctx).await,
		GroupsCommands::Create(args) => handle_create(args, ctx).await,
		GroupsCommands::Update(args) => handle_update(args, ctx).await,
		GroupsCommands::Delete(args) => handle_delete(args, ctx).await,
		GroupsCommands::Members(args) => handle_members(args, ctx).await,
		GroupsCommands::AddMember(args) => handle_add_member(args, ctx).await,
		GroupsCommands::RemoveMember(args) => handle_remove_member(args, ctx).await,
		GroupsCommands::Permissions(args) => handle_permissions(args, ctx).await,
	}
}

#[instrument(skip(ctx))]
async fn handle_list(args: ListArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let groups = client.list_groups(args.all).await?;
	let groups = fuzzy_filter(&groups, args.filter.as_deref().unwrap_or(""), |g| g.name.clone());

	if ctx.json {
		return print_json(&groups);
	}

	if groups.is_empty() {
		println!("No groups found");
		return Ok(());
	}

	println!(
		"{:<38} {:<24} {:<8} {}",
		style("ID").bold().underlined(),
		style("NAME").bold().underlined(),
		style("TYPE").bold().underlined(),
		style("DESCRIPTION").bold().underlined()
	);

	for group in groups {
		let kind = if group.is_admin {
			style("admin").red()
		} else if group.is_system {
			style("default").cyan()
		} else {
			style("custom").dim()
		};
		println!(
			"{:<38} {:<24} {:<8} {}",
			group.id,
			group.name,
			kind,
			group.description.as_deref().unwrap_or("-")
		);
	}

	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_create(args: CreateArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let group = client
		.create_group(&CreateGroupRequest {
			name: args.name,
			description: args.description,
			is_admin: args.admin,
		})
		.await?;

	if ctx.json {
		return print_json(&group);
	}

	success(format!("Group {} created", style(&group.name).cyan()));
	println!("  ID: {}", group.id);
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_update(args: UpdateArgs, ctx: &CliContext) -> anyhow::Result<()> {
	if args.name.is_none() && args.description.is_none() {
		anyhow::bail!("nothing to update: pass --name or --description");
	}

	let client = ctx.client()?;
	let group = client
		.update_group(
			args.group_id,
			&UpdateGroupRequest {
				name: args.name,
				description: args.description,
			},
		)
		.await?;

	if ctx.json {
		return print_json(&group);
	}

	success(format!("Group {} updated", style(&group.name).cyan()));
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_delete(args: GroupArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let groups = client.list_groups(true).await?;
	let group = groups
		.iter()
		.find(|g| g.id == args.group_id)
		.with_context(|| format!("group {} not found", args.group_id))?;

	client.delete_group_checked(group).await?;

	if ctx.json {
		return print_json(&serde_json::json!({ "deleted": true, "id": group.id }));
	}

	success(format!("Group {} deleted", style(&group.name).cyan()));
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_members(args: GroupArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let members = client.list_members(args.group_id).await?;

	if ctx.json {
		return print_json(&members);
	}

	if members.is_empty() {
		println!("No members");
		return Ok(());
	}

	println!(
		"{:<38} {:<32} {}",
		style("USER ID").bold().underlined(),
		style("EMAIL").bold().underlined(),
		style("NICKNAME").bold().underlined()
	);
	for member in members {
		println!("{:<38} {:<32} {}", member.id, member.email, member.nickname);
	}
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_add_member(args: MemberArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let membership = client.add_member(args.group_id, args.user_id).await?;

	if ctx.json {
		return print_json(&membership);
	}

	if membership.created {
		success(format!("Added {} to group {}", args.user_id, args.group_id));
	} else {
		println!(
			"{} {} is already a member of {}",
			style("!").yellow().bold(),
			args.user_id,
			args.group_id
		);
	}
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_remove_member(args: MemberArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	client.remove_member(args.group_id, args.user_id).await?;

	if ctx.json {
		return print_json(&serde_json::json!({ "deleted": true }));
	}

	success(format!("Removed {} from group {}", args.user_id, args.group_id));
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_permissions(args: GroupArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let grants = client.list_group_permissions(args.group_id).await?;

	if ctx.json {
		return print_json(&grants);
	}

	if grants.is_empty() {
		println!("No grants");
		return Ok(());
	}

	println!(
		"{:<38} {:<24} {:<6} {:<6} {:<6} {}",
		style("PERMISSION ID").bold().underlined(),
		style("KNOWLEDGE BASE").bold().underlined(),
		style("READ").bold().underlined(),
		style("UPDATE").bold().underlined(),
		style("DELETE").bold().underlined(),
		style("CREATE").bold().underlined()
	);
	for grant in grants {
		println!(
			"{:<38} {:<24} {:<6} {:<6} {:<6} {}",
			grant.id,
			grant.kb_name.as_deref().unwrap_or("-"),
			flag(grant.can_read),
			flag(grant.can_update),
			flag(grant.can_delete),
			flag(grant.can_create)
		);
	}
	Ok(())
}

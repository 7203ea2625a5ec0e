// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use clap::{Args, Subcommand};
use console::style;
use ragward_client::ClientError;
use ragward_server_api::{ListUsersParams, DEFAULT_PAGE_SIZE};
use tracing::instrument;
use uuid::Uuid;

use crate::context::CliContext;
use crate::output::{flag, print_json, success};

#[derive(Debug, Subcommand)]
pub enum AdminCommands {
	/// List users with their groups
	Users(UsersArgs),
	/// Delete a user account
	DeleteUser(DeleteUserArgs),
	/// List every knowledge base
	Kbs,
}

#[derive(Debug, Clone, Args)]
pub struct UsersArgs {
	#[arg(long, default_value_t = 1)]
	pub page: u32,

	#[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
	pub page_size: u32,

	/// Match on email or nickname
	#[arg(long)]
	pub search: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteUserArgs {
	pub user_id: Uuid,
}

pub async fn handle(cmd: AdminCommands, ctx: &CliContext) -> anyhow::Result<()> {
	match cmd {
		AdminCommands::Users(args) => handle_users(args, ctx).await,
		AdminCommands::DeleteUser(args) => handle_delete_user(args, ctx).await,
		AdminCommands::Kbs => handle_kbs(ctx).await,
	}
}

/// The admin routes only exist when the server runs with enterprise enabled.
fn listing_error(err: ClientError) -> anyhow::Error {
	match err {
		ClientError::NotFound(_) => {
			anyhow::anyhow!("admin routes are not available (is enterprise mode enabled on the server?)")
		}
		other => other.into(),
	}
}

#[instrument(skip(ctx))]
async fn handle_users(args: UsersArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let page = client
		.list_users(&ListUsersParams {
			page: args.page,
			page_size: args.page_size,
			search: args.search,
		})
		.await
		.map_err(listing_error)?;

	if ctx.json {
		return print_json(&page);
	}

	if page.users.is_empty() {
		println!("No users found");
		return Ok(());
	}

	println!(
		"{:<38} {:<32} {:<20} {:<6} {}",
		style("ID").bold().underlined(),
		style("EMAIL").bold().underlined(),
		style("NICKNAME").bold().underlined(),
		style("ADMIN").bold().underlined(),
		style("GROUPS").bold().underlined()
	);
	for user in &page.users {
		let groups: Vec<_> = user.groups.iter().map(|g| g.name.as_str()).collect();
		println!(
			"{:<38} {:<32} {:<20} {:<6} {}",
			user.id,
			user.email,
			user.nickname,
			flag(user.is_admin),
			groups.join(", ")
		);
	}

	let pages = (page.total.max(0) as u64).div_ceil(u64::from(page.page_size.max(1)));
	println!(
		"\n{}",
		style(format!("Page {} of {} ({} users)", page.page, pages.max(1), page.total)).dim()
	);
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_delete_user(args: DeleteUserArgs, ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	client.delete_user(args.user_id).await?;

	if ctx.json {
		return print_json(&serde_json::json!({ "deleted": true }));
	}

	success(format!("User {} deleted", args.user_id));
	Ok(())
}

#[instrument(skip(ctx))]
async fn handle_kbs(ctx: &CliContext) -> anyhow::Result<()> {
	let client = ctx.client()?;
	let kbs = client.list_kbs().await.map_err(listing_error)?;

	if ctx.json {
		return print_json(&kbs);
	}

	if kbs.is_empty() {
		println!("No knowledge bases");
		return Ok(());
	}

	println!(
		"{:<38} {:<32} {}",
		style("ID").bold().underlined(),
		style("NAME").bold().underlined(),
		style("CREATED").bold().underlined()
	);
	for kb in kbs {
		let created = kb.created_at.format("%Y-%m-%d %H:%M").to_string();
		println!("{:<38} {:<32} {}", kb.id, kb.name, style(created).dim());
	}
	Ok(())
}

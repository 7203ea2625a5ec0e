// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Ragward authorization server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ragward_server::{api::cors_layer, create_app_state, create_router, AppState};
use ragward_server_auth::{generate_access_token, hash_token, KbId, KnowledgeBase, User, UserId};
use ragward_server_config::{LogFormat, ServerConfig};
use ragward_server_db::{create_pool, run_migrations};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ragward server - group-based access control for knowledge bases.
#[derive(Parser, Debug)]
#[command(name = "ragward-server", about = "Ragward authorization server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/ragward/server.toml)
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Create a user and print their bearer token
	CreateUser {
		#[arg(long)]
		email: String,
		#[arg(long)]
		nickname: String,
		/// Also add the user to the administrators group
		#[arg(long)]
		admin: bool,
	},
	/// Issue a new bearer token for an existing user
	RotateToken {
		/// User ID
		user_id: String,
	},
	/// Register a knowledge base
	CreateKb {
		#[arg(long)]
		name: String,
	},
	/// Soft-delete a knowledge base and drop its grants
	DeleteKb {
		/// Knowledge base ID
		kb_id: String,
	},
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("ragward-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => ragward_server_config::load_config_with_file(path)?,
		None => ragward_server_config::load_config()?,
	};
	init_tracing(&config);

	let pool = create_pool(&config.database.url).await?;
	run_migrations(&pool).await?;
	let state = create_app_state(pool, &config).await?;

	match args.command.unwrap_or(Command::Serve) {
		Command::Serve => serve(state, &config).await,
		Command::CreateUser {
			email,
			nickname,
			admin,
		} => create_user(&state, email, nickname, admin).await,
		Command::RotateToken { user_id } => rotate_token(&state, &user_id).await,
		Command::CreateKb { name } => create_kb(&state, name).await,
		Command::DeleteKb { kb_id } => delete_kb(&state, &kb_id).await,
		Command::Version => Ok(()),
	}
}

fn init_tracing(config: &ServerConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);
	match config.logging.format {
		LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
	}
}

async fn serve(state: AppState, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		enterprise = config.rbac.enterprise,
		"starting ragward-server"
	);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(cors_layer(&config.http.cors_allowed_origins));

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}

async fn create_user(
	state: &AppState,
	email: String,
	nickname: String,
	admin: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let user = User::new(email.trim(), nickname.trim());
	let token = generate_access_token();
	state.user_repo.create_user(&user, &hash_token(&token)).await?;

	state
		.group_repo
		.add_member(&state.default_groups.users, &user.id)
		.await?;
	if admin {
		state
			.group_repo
			.add_member(&state.default_groups.admin, &user.id)
			.await?;
	}

	tracing::info!(user_id = %user.id, admin, "user created");
	println!("user_id: {}", user.id);
	println!("token:   {token}");
	Ok(())
}

async fn rotate_token(state: &AppState, user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
	let user_id: UserId = user_id.trim().parse()?;
	let token = generate_access_token();
	if !state.user_repo.rotate_token(&user_id, &hash_token(&token)).await? {
		return Err(format!("user {user_id} not found").into());
	}

	tracing::info!(%user_id, "token rotated");
	println!("token: {token}");
	Ok(())
}

async fn create_kb(state: &AppState, name: String) -> Result<(), Box<dyn std::error::Error>> {
	let kb = KnowledgeBase::new(name.trim());
	state.kb_repo.create_kb(&kb).await?;
	tracing::info!(kb_id = %kb.id, name = %kb.name, "knowledge base created");
	println!("kb_id: {}", kb.id);
	Ok(())
}

async fn delete_kb(state: &AppState, kb_id: &str) -> Result<(), Box<dyn std::error::Error>> {
	let kb_id: KbId = kb_id.trim().parse()?;
	if !state.kb_repo.soft_delete_kb(&kb_id).await? {
		return Err(format!("knowledge base {kb_id} not found").into());
	}
	let grants = state.permission_repo.delete_all_for_kb(&kb_id).await?;
	tracing::info!(%kb_id, grants, "knowledge base deleted");
	println!("deleted knowledge base {kb_id} ({grants} grants removed)");
	Ok(())
}

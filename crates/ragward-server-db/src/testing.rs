// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for tests that need a migrated database.

use std::str::FromStr;

use ragward_server_auth::{hash_token, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::DbError;
use crate::pool::run_migrations;
use crate::user::UserRepository;

/// Single-connection in-memory pool with the schema applied.
pub async fn create_test_pool() -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(":memory:")
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.foreign_keys(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await?;
	run_migrations(&pool).await?;
	Ok(pool)
}

/// Insert a user whose access token is `token-<email>`.
pub async fn insert_user(pool: &SqlitePool, email: &str, nickname: &str) -> Result<User, DbError> {
	let user = User::new(email, nickname);
	UserRepository::new(pool.clone())
		.create_user(&user, &hash_token(&format!("token-{email}")))
		.await?;
	Ok(user)
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use ragward_server_auth::{User, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::columns;
use crate::error::DbError;

const USER_COLUMNS: &str = "id, email, nickname, avatar_url, created_at, updated_at, deleted_at";

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &User, token_hash: &str) -> Result<(), DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn get_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, DbError>;
	async fn list_users(
		&self,
		search: Option<&str>,
		limit: i64,
		offset: i64,
	) -> Result<(Vec<User>, i64), DbError>;
	async fn rotate_token(&self, id: &UserId, token_hash: &str) -> Result<bool, DbError>;
	async fn soft_delete_user(&self, id: &UserId) -> Result<bool, DbError>;
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a user with the digest of their access token.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the email is already registered.
	#[tracing::instrument(skip(self, user, token_hash), fields(user_id = %user.id))]
	pub async fn create_user(&self, user: &User, token_hash: &str) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO users (id, email, nickname, avatar_url, token_hash, created_at, updated_at, deleted_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(&user.nickname)
		.bind(&user.avatar_url)
		.bind(token_hash)
		.bind(user.created_at.to_rfc3339())
		.bind(user.updated_at.to_rfc3339())
		.bind(user.deleted_at.map(|d| d.to_rfc3339()))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, format!("user '{}' already exists", user.email)))?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(())
	}

	/// Get an active user by ID.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {USER_COLUMNS} FROM users WHERE id = ? AND deleted_at IS NULL"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Get the active user owning a token digest.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {USER_COLUMNS} FROM users WHERE token_hash = ? AND deleted_at IS NULL"
		))
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// List active users, newest first, with the total count before paging.
	///
	/// `search` matches email or nickname case-insensitively.
	#[tracing::instrument(skip(self))]
	pub async fn list_users(
		&self,
		search: Option<&str>,
		limit: i64,
		offset: i64,
	) -> Result<(Vec<User>, i64), DbError> {
		let pattern = search
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(|s| format!("%{}%", escape_like(&s.to_lowercase())));

		let (rows, total) = match &pattern {
			Some(pattern) => {
				let filter = "deleted_at IS NULL AND (LOWER(email) LIKE ? ESCAPE '\\' OR LOWER(nickname) LIKE ? ESCAPE '\\')";
				let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {filter}"))
					.bind(pattern)
					.bind(pattern)
					.fetch_one(&self.pool)
					.await?;
				let rows = sqlx::query(&format!(
					"SELECT {USER_COLUMNS} FROM users WHERE {filter} ORDER BY created_at DESC LIMIT ? OFFSET ?"
				))
				.bind(pattern)
				.bind(pattern)
				.bind(limit)
				.bind(offset)
				.fetch_all(&self.pool)
				.await?;
				(rows, total)
			}
			None => {
				let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
					.fetch_one(&self.pool)
					.await?;
				let rows = sqlx::query(&format!(
					"SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY created_at DESC LIMIT ? OFFSET ?"
				))
				.bind(limit)
				.bind(offset)
				.fetch_all(&self.pool)
				.await?;
				(rows, total)
			}
		};

		let users: Result<Vec<_>, _> = rows.iter().map(row_to_user).collect();
		let users = users?;
		tracing::debug!(count = users.len(), total, "listed users");
		Ok((users, total))
	}

	/// Replace a user's token digest.
	#[tracing::instrument(skip(self, token_hash), fields(user_id = %id))]
	pub async fn rotate_token(&self, id: &UserId, token_hash: &str) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE users SET token_hash = ?, updated_at = ?
			WHERE id = ? AND deleted_at IS NULL
			"#,
		)
		.bind(token_hash)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Soft-delete a user and revoke their token.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn soft_delete_user(&self, id: &UserId) -> Result<bool, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE users
			SET deleted_at = ?, updated_at = ?, token_hash = NULL
			WHERE id = ? AND deleted_at IS NULL
			"#,
		)
		.bind(&now)
		.bind(&now)
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		let deleted = result.rows_affected() > 0;
		tracing::debug!(user_id = %id, deleted, "user soft-deleted");
		Ok(deleted)
	}
}

fn escape_like(raw: &str) -> String {
	raw
		.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_")
}

pub(crate) fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	Ok(User {
		id: columns::id(row, "id")?,
		email: row.get("email"),
		nickname: row.get("nickname"),
		avatar_url: row.get("avatar_url"),
		created_at: columns::timestamp(row, "created_at")?,
		updated_at: columns::timestamp(row, "updated_at")?,
		deleted_at: columns::optional_timestamp(row, "deleted_at"),
	})
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User, token_hash: &str) -> Result<(), DbError> {
		self.create_user(user, token_hash).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn get_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, DbError> {
		self.get_user_by_token_hash(token_hash).await
	}

	async fn list_users(
		&self,
		search: Option<&str>,
		limit: i64,
		offset: i64,
	) -> Result<(Vec<User>, i64), DbError> {
		self.list_users(search, limit, offset).await
	}

	async fn rotate_token(&self, id: &UserId, token_hash: &str) -> Result<bool, DbError> {
		self.rotate_token(id, token_hash).await
	}

	async fn soft_delete_user(&self, id: &UserId) -> Result<bool, DbError> {
		self.soft_delete_user(id).await
	}
}

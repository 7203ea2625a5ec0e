// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	/// Maps a unique-constraint violation to [`DbError::Conflict`].
	pub(crate) fn from_insert(err: sqlx::Error, what: impl Into<String>) -> Self {
		let is_unique = err
			.as_database_error()
			.map(|db| db.is_unique_violation())
			.unwrap_or(false);
		if is_unique {
			DbError::Conflict(what.into())
		} else {
			DbError::Sqlx(err)
		}
	}
}

pub type Result<T> = std::result::Result<T, DbError>;

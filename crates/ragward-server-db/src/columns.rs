// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column decoding shared by the repositories.
//!
//! IDs and timestamps are stored as TEXT (UUID strings and RFC 3339).

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn id<T: From<Uuid>>(row: &SqliteRow, column: &str) -> Result<T, DbError> {
	let raw: String = row.get(column);
	Uuid::parse_str(&raw)
		.map(T::from)
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, DbError> {
	let raw: String = row.get(column);
	DateTime::parse_from_rfc3339(&raw)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

pub(crate) fn optional_timestamp(row: &SqliteRow, column: &str) -> Option<DateTime<Utc>> {
	let raw: Option<String> = row.get(column);
	raw.and_then(|d| DateTime::parse_from_rfc3339(&d).ok())
		.map(|dt| dt.with_timezone(&Utc))
}

pub(crate) fn flag(row: &SqliteRow, column: &str) -> bool {
	let value: i32 = row.get(column);
	value != 0
}

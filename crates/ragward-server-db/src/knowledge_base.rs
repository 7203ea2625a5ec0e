// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Knowledge base registry.
//!
//! Knowledge bases belong to the host application; the service only needs
//! their identity and display name to validate grants.

use async_trait::async_trait;
use chrono::Utc;
use ragward_server_auth::{KbId, KnowledgeBase};
use sqlx::{sqlite::SqlitePool, Row};

use crate::columns;
use crate::error::DbError;

#[async_trait]
pub trait KnowledgeBaseStore: Send + Sync {
	async fn create_kb(&self, kb: &KnowledgeBase) -> Result<(), DbError>;
	async fn get_kb(&self, id: &KbId) -> Result<Option<KnowledgeBase>, DbError>;
	async fn list_kbs(&self) -> Result<Vec<KnowledgeBase>, DbError>;
	async fn soft_delete_kb(&self, id: &KbId) -> Result<bool, DbError>;
}

#[derive(Clone)]
pub struct KnowledgeBaseRepository {
	pool: SqlitePool,
}

impl KnowledgeBaseRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, kb), fields(kb_id = %kb.id))]
	pub async fn create_kb(&self, kb: &KnowledgeBase) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO knowledge_bases (id, name, created_at, deleted_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(kb.id.to_string())
		.bind(&kb.name)
		.bind(kb.created_at.to_rfc3339())
		.bind(kb.deleted_at.map(|d| d.to_rfc3339()))
		.execute(&self.pool)
		.await?;

		tracing::debug!(kb_id = %kb.id, "knowledge base registered");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(kb_id = %id))]
	pub async fn get_kb(&self, id: &KbId) -> Result<Option<KnowledgeBase>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, created_at, deleted_at
			FROM knowledge_bases
			WHERE id = ? AND deleted_at IS NULL
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_kb(&r)).transpose()
	}

	/// List live knowledge bases by name.
	#[tracing::instrument(skip(self))]
	pub async fn list_kbs(&self) -> Result<Vec<KnowledgeBase>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, name, created_at, deleted_at
			FROM knowledge_bases
			WHERE deleted_at IS NULL
			ORDER BY name ASC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_kb).collect()
	}

	#[tracing::instrument(skip(self), fields(kb_id = %id))]
	pub async fn soft_delete_kb(&self, id: &KbId) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE knowledge_bases SET deleted_at = ?
			WHERE id = ? AND deleted_at IS NULL
			"#,
		)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn row_to_kb(row: &sqlx::sqlite::SqliteRow) -> Result<KnowledgeBase, DbError> {
	Ok(KnowledgeBase {
		id: columns::id(row, "id")?,
		name: row.get("name"),
		created_at: columns::timestamp(row, "created_at")?,
		deleted_at: columns::optional_timestamp(row, "deleted_at"),
	})
}

#[async_trait]
impl KnowledgeBaseStore for KnowledgeBaseRepository {
	async fn create_kb(&self, kb: &KnowledgeBase) -> Result<(), DbError> {
		self.create_kb(kb).await
	}

	async fn get_kb(&self, id: &KbId) -> Result<Option<KnowledgeBase>, DbError> {
		self.get_kb(id).await
	}

	async fn list_kbs(&self) -> Result<Vec<KnowledgeBase>, DbError> {
		self.list_kbs().await
	}

	async fn soft_delete_kb(&self, id: &KbId) -> Result<bool, DbError> {
		self.soft_delete_kb(id).await
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Knowledge base grant repository.
//!
//! Each `(group, knowledge base)` pair holds at most one grant; setting a
//! grant for an existing pair updates it in place.

use async_trait::async_trait;
use chrono::Utc;
use ragward_server_auth::{GroupId, KbAccess, KbId, KbPermission, PermissionId, UNKNOWN_KB_NAME};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::columns;
use crate::error::DbError;

const PERMISSION_COLUMNS: &str =
	"p.id, p.group_id, p.kb_id, p.can_read, p.can_update, p.can_delete, p.can_create, p.created_at, p.updated_at";

/// A grant together with its group's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionWithGroup {
	pub permission: KbPermission,
	pub group_name: String,
}

/// A grant together with its knowledge base's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionWithKb {
	pub permission: KbPermission,
	pub kb_name: String,
}

#[async_trait]
pub trait PermissionStore: Send + Sync {
	async fn set_permission(
		&self,
		group_id: &GroupId,
		kb_id: &KbId,
		access: KbAccess,
	) -> Result<KbPermission, DbError>;
	async fn get_permission(&self, id: &PermissionId) -> Result<Option<KbPermission>, DbError>;
	async fn update_permission(&self, id: &PermissionId, access: KbAccess) -> Result<bool, DbError>;
	async fn delete_permission(&self, id: &PermissionId) -> Result<bool, DbError>;
	async fn delete_all_for_kb(&self, kb_id: &KbId) -> Result<u64, DbError>;
	async fn list_for_kb(&self, kb_id: &KbId) -> Result<Vec<PermissionWithGroup>, DbError>;
	async fn list_for_group(&self, group_id: &GroupId) -> Result<Vec<PermissionWithKb>, DbError>;
	async fn list_for_groups(&self, group_ids: &[GroupId]) -> Result<Vec<KbPermission>, DbError>;
}

#[derive(Clone)]
pub struct PermissionRepository {
	pool: SqlitePool,
}

impl PermissionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create or overwrite the grant for a group on a knowledge base.
	#[tracing::instrument(skip(self, access), fields(group_id = %group_id, kb_id = %kb_id))]
	pub async fn set_permission(
		&self,
		group_id: &GroupId,
		kb_id: &KbId,
		access: KbAccess,
	) -> Result<KbPermission, DbError> {
		let now = Utc::now().to_rfc3339();
		sqlx::query(
			r#"
			INSERT INTO group_kb_permissions
				(id, group_id, kb_id, can_read, can_update, can_delete, can_create, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(group_id, kb_id) DO UPDATE SET
				can_read = excluded.can_read,
				can_update = excluded.can_update,
				can_delete = excluded.can_delete,
				can_create = excluded.can_create,
				updated_at = excluded.updated_at
			"#,
		)
		.bind(PermissionId::generate().to_string())
		.bind(group_id.to_string())
		.bind(kb_id.to_string())
		.bind(access.can_read as i32)
		.bind(access.can_update as i32)
		.bind(access.can_delete as i32)
		.bind(access.can_create as i32)
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await?;

		let row = sqlx::query(&format!(
			"SELECT {PERMISSION_COLUMNS} FROM group_kb_permissions p WHERE p.group_id = ? AND p.kb_id = ?"
		))
		.bind(group_id.to_string())
		.bind(kb_id.to_string())
		.fetch_one(&self.pool)
		.await?;

		let permission = row_to_permission(&row)?;
		tracing::debug!(permission_id = %permission.id, "kb permission set");
		Ok(permission)
	}

	#[tracing::instrument(skip(self), fields(permission_id = %id))]
	pub async fn get_permission(&self, id: &PermissionId) -> Result<Option<KbPermission>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {PERMISSION_COLUMNS} FROM group_kb_permissions p WHERE p.id = ?"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_permission(&r)).transpose()
	}

	#[tracing::instrument(skip(self, access), fields(permission_id = %id))]
	pub async fn update_permission(&self, id: &PermissionId, access: KbAccess) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE group_kb_permissions
			SET can_read = ?, can_update = ?, can_delete = ?, can_create = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(access.can_read as i32)
		.bind(access.can_update as i32)
		.bind(access.can_delete as i32)
		.bind(access.can_create as i32)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		let updated = result.rows_affected() > 0;
		tracing::debug!(permission_id = %id, updated, "kb permission updated");
		Ok(updated)
	}

	#[tracing::instrument(skip(self), fields(permission_id = %id))]
	pub async fn delete_permission(&self, id: &PermissionId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM group_kb_permissions WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		tracing::debug!(permission_id = %id, deleted, "kb permission deleted");
		Ok(deleted)
	}

	/// Remove every grant on a knowledge base, e.g. when it is deleted.
	#[tracing::instrument(skip(self), fields(kb_id = %kb_id))]
	pub async fn delete_all_for_kb(&self, kb_id: &KbId) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM group_kb_permissions WHERE kb_id = ?")
			.bind(kb_id.to_string())
			.execute(&self.pool)
			.await?;

		let removed = result.rows_affected();
		tracing::info!(kb_id = %kb_id, removed, "removed all grants for knowledge base");
		Ok(removed)
	}

	/// List grants on a knowledge base held by live groups.
	#[tracing::instrument(skip(self), fields(kb_id = %kb_id))]
	pub async fn list_for_kb(&self, kb_id: &KbId) -> Result<Vec<PermissionWithGroup>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {PERMISSION_COLUMNS}, g.name AS group_name
			FROM group_kb_permissions p
			INNER JOIN user_groups g ON g.id = p.group_id
			WHERE p.kb_id = ? AND g.deleted_at IS NULL
			ORDER BY g.name ASC
			"#
		))
		.bind(kb_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows
			.iter()
			.map(|row| {
				Ok(PermissionWithGroup {
					permission: row_to_permission(row)?,
					group_name: row.get("group_name"),
				})
			})
			.collect()
	}

	/// List a group's grants, naming each knowledge base.
	#[tracing::instrument(skip(self), fields(group_id = %group_id))]
	pub async fn list_for_group(&self, group_id: &GroupId) -> Result<Vec<PermissionWithKb>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {PERMISSION_COLUMNS}, k.name AS kb_name
			FROM group_kb_permissions p
			LEFT JOIN knowledge_bases k ON k.id = p.kb_id AND k.deleted_at IS NULL
			WHERE p.group_id = ?
			ORDER BY p.created_at ASC
			"#
		))
		.bind(group_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows
			.iter()
			.map(|row| {
				let kb_name: Option<String> = row.get("kb_name");
				Ok(PermissionWithKb {
					permission: row_to_permission(row)?,
					kb_name: kb_name.unwrap_or_else(|| UNKNOWN_KB_NAME.to_string()),
				})
			})
			.collect()
	}

	/// List every grant held by any of the given groups.
	#[tracing::instrument(skip(self, group_ids), fields(groups = group_ids.len()))]
	pub async fn list_for_groups(&self, group_ids: &[GroupId]) -> Result<Vec<KbPermission>, DbError> {
		if group_ids.is_empty() {
			return Ok(Vec::new());
		}

		let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
			"SELECT {PERMISSION_COLUMNS} FROM group_kb_permissions p WHERE p.group_id IN ("
		));
		let mut separated = builder.separated(", ");
		for id in group_ids {
			separated.push_bind(id.to_string());
		}
		separated.push_unseparated(")");

		let rows = builder.build().fetch_all(&self.pool).await?;
		rows.iter().map(row_to_permission).collect()
	}
}

fn row_to_permission(row: &sqlx::sqlite::SqliteRow) -> Result<KbPermission, DbError> {
	Ok(KbPermission {
		id: columns::id(row, "id")?,
		group_id: columns::id(row, "group_id")?,
		kb_id: columns::id(row, "kb_id")?,
		access: KbAccess {
			can_read: columns::flag(row, "can_read"),
			can_update: columns::flag(row, "can_update"),
			can_delete: columns::flag(row, "can_delete"),
			can_create: columns::flag(row, "can_create"),
		},
		created_at: columns::timestamp(row, "created_at")?,
		updated_at: columns::timestamp(row, "updated_at")?,
	})
}

#[async_trait]
impl PermissionStore for PermissionRepository {
	async fn set_permission(
		&self,
		group_id: &GroupId,
		kb_id: &KbId,
		access: KbAccess,
	) -> Result<KbPermission, DbError> {
		self.set_permission(group_id, kb_id, access).await
	}

	async fn get_permission(&self, id: &PermissionId) -> Result<Option<KbPermission>, DbError> {
		self.get_permission(id).await
	}

	async fn update_permission(&self, id: &PermissionId, access: KbAccess) -> Result<bool, DbError> {
		self.update_permission(id, access).await
	}

	async fn delete_permission(&self, id: &PermissionId) -> Result<bool, DbError> {
		self.delete_permission(id).await
	}

	async fn delete_all_for_kb(&self, kb_id: &KbId) -> Result<u64, DbError> {
		self.delete_all_for_kb(kb_id).await
	}

	async fn list_for_kb(&self, kb_id: &KbId) -> Result<Vec<PermissionWithGroup>, DbError> {
		self.list_for_kb(kb_id).await
	}

	async fn list_for_group(&self, group_id: &GroupId) -> Result<Vec<PermissionWithKb>, DbError> {
		self.list_for_group(group_id).await
	}

	async fn list_for_groups(&self, group_ids: &[GroupId]) -> Result<Vec<KbPermission>, DbError> {
		self.list_for_groups(group_ids).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::group::GroupRepository;
	use crate::knowledge_base::KnowledgeBaseRepository;
	use crate::testing::create_test_pool;
	use ragward_server_auth::{KnowledgeBase, UserGroup};

	struct Fixture {
		groups: GroupRepository,
		kbs: KnowledgeBaseRepository,
		perms: PermissionRepository,
	}

	async fn fixture() -> Fixture {
		let pool = create_test_pool().await.unwrap();
		Fixture {
			groups: GroupRepository::new(pool.clone()),
			kbs: KnowledgeBaseRepository::new(pool.clone()),
			perms: PermissionRepository::new(pool),
		}
	}

	fn read_only() -> KbAccess {
		KbAccess {
			can_read: true,
			..KbAccess::deny()
		}
	}

	#[tokio::test]
	async fn test_set_permission_upserts_pair() {
		let f = fixture().await;
		let group = UserGroup::new("Readers", None, false);
		f.groups.create_group(&group).await.unwrap();
		let kb = KnowledgeBase::new("manuals");
		f.kbs.create_kb(&kb).await.unwrap();

		let first = f.perms.set_permission(&group.id, &kb.id, read_only()).await.unwrap();
		let second = f
			.perms
			.set_permission(&group.id, &kb.id, KbAccess::full())
			.await
			.unwrap();

		assert_eq!(first.id, second.id);
		assert_eq!(second.access, KbAccess::full());
		assert_eq!(f.perms.list_for_kb(&kb.id).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_update_and_delete_permission() {
		let f = fixture().await;
		let group = UserGroup::new("Readers", None, false);
		f.groups.create_group(&group).await.unwrap();
		let kb_id = KbId::generate();
		let perm = f.perms.set_permission(&group.id, &kb_id, read_only()).await.unwrap();

		let access = KbAccess {
			can_delete: true,
			..read_only()
		};
		assert!(f.perms.update_permission(&perm.id, access).await.unwrap());
		let fetched = f.perms.get_permission(&perm.id).await.unwrap().unwrap();
		assert_eq!(fetched.access, access);

		assert!(f.perms.delete_permission(&perm.id).await.unwrap());
		assert!(!f.perms.delete_permission(&perm.id).await.unwrap());
		assert!(!f
			.perms
			.update_permission(&perm.id, KbAccess::full())
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn test_list_for_kb_skips_deleted_groups() {
		let f = fixture().await;
		let live = UserGroup::new("Live", None, false);
		let gone = UserGroup::new("Gone", None, false);
		f.groups.create_group(&live).await.unwrap();
		f.groups.create_group(&gone).await.unwrap();
		let kb_id = KbId::generate();
		f.perms.set_permission(&live.id, &kb_id, read_only()).await.unwrap();
		f.perms.set_permission(&gone.id, &kb_id, read_only()).await.unwrap();
		f.groups.soft_delete_group(&gone.id).await.unwrap();

		let listed = f.perms.list_for_kb(&kb_id).await.unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].group_name, "Live");
	}

	#[tokio::test]
	async fn test_list_for_group_names_unknown_kbs() {
		let f = fixture().await;
		let group = UserGroup::new("Readers", None, false);
		f.groups.create_group(&group).await.unwrap();
		let kb = KnowledgeBase::new("manuals");
		f.kbs.create_kb(&kb).await.unwrap();
		f.perms.set_permission(&group.id, &kb.id, read_only()).await.unwrap();
		f.perms
			.set_permission(&group.id, &KbId::generate(), read_only())
			.await
			.unwrap();

		let mut names: Vec<_> = f
			.perms
			.list_for_group(&group.id)
			.await
			.unwrap()
			.into_iter()
			.map(|p| p.kb_name)
			.collect();
		names.sort();
		assert_eq!(names, vec!["Unknown".to_string(), "manuals".to_string()]);
	}

	#[tokio::test]
	async fn test_list_for_groups_and_delete_all_for_kb() {
		let f = fixture().await;
		let a = UserGroup::new("A", None, false);
		let b = UserGroup::new("B", None, false);
		f.groups.create_group(&a).await.unwrap();
		f.groups.create_group(&b).await.unwrap();
		let kb_id = KbId::generate();
		f.perms.set_permission(&a.id, &kb_id, read_only()).await.unwrap();
		f.perms.set_permission(&b.id, &kb_id, read_only()).await.unwrap();

		assert!(f.perms.list_for_groups(&[]).await.unwrap().is_empty());
		assert_eq!(f.perms.list_for_groups(&[a.id, b.id]).await.unwrap().len(), 2);

		assert_eq!(f.perms.delete_all_for_kb(&kb_id).await.unwrap(), 2);
		assert!(f.perms.list_for_groups(&[a.id, b.id]).await.unwrap().is_empty());
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group repository for database operations.
//!
//! This module provides database access for:
//! - Group CRUD with soft delete
//! - Group membership (idempotent add, remove, listing)
//! - Default group bootstrap and enrollment of ungrouped users

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use ragward_server_auth::{GroupId, GroupMembership, MembershipId, User, UserGroup, UserId};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::DbError;
use crate::columns;

const GROUP_COLUMNS: &str =
	"g.id, g.name, g.description, g.is_admin, g.is_system, g.created_at, g.updated_at, g.deleted_at";

#[async_trait]
pub trait GroupStore: Send + Sync {
	async fn create_group(&self, group: &UserGroup) -> Result<(), DbError>;
	async fn get_group(&self, id: &GroupId) -> Result<Option<UserGroup>, DbError>;
	async fn get_group_by_name(&self, name: &str) -> Result<Option<UserGroup>, DbError>;
	async fn list_groups(&self) -> Result<Vec<UserGroup>, DbError>;
	async fn update_group(&self, group: &UserGroup) -> Result<(), DbError>;
	async fn soft_delete_group(&self, id: &GroupId) -> Result<bool, DbError>;
	async fn find_system_group(&self, is_admin: bool) -> Result<Option<UserGroup>, DbError>;
	async fn ensure_system_group(&self, template: &UserGroup) -> Result<UserGroup, DbError>;
	async fn list_groups_for_user(&self, user_id: &UserId) -> Result<Vec<UserGroup>, DbError>;
	async fn list_groups_for_users(
		&self,
		user_ids: &[UserId],
	) -> Result<HashMap<UserId, Vec<UserGroup>>, DbError>;
	async fn add_member(
		&self,
		group_id: &GroupId,
		user_id: &UserId,
	) -> Result<(GroupMembership, bool), DbError>;
	async fn remove_member(&self, group_id: &GroupId, user_id: &UserId) -> Result<bool, DbError>;
	async fn is_member(&self, group_id: &GroupId, user_id: &UserId) -> Result<bool, DbError>;
	async fn list_members(&self, group_id: &GroupId) -> Result<Vec<User>, DbError>;
	async fn enroll_ungrouped_users(&self, group_id: &GroupId) -> Result<u64, DbError>;
}

/// Repository for group database operations.
///
/// Manages groups and their members. All IDs are UUIDs stored as strings in
/// SQLite.
#[derive(Clone)]
pub struct GroupRepository {
	pool: SqlitePool,
}

impl GroupRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	// =========================================================================
	// Group CRUD
	// =========================================================================

	/// Create a new group.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if a live group already uses the name.
	#[tracing::instrument(skip(self, group), fields(group_id = %group.id, name = %group.name))]
	pub async fn create_group(&self, group: &UserGroup) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO user_groups (id, name, description, is_admin, is_system, created_at, updated_at, deleted_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(group.id.to_string())
		.bind(&group.name)
		.bind(&group.description)
		.bind(group.is_admin as i32)
		.bind(group.is_system as i32)
		.bind(group.created_at.to_rfc3339())
		.bind(group.updated_at.to_rfc3339())
		.bind(group.deleted_at.map(|d| d.to_rfc3339()))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, format!("group name '{}' already exists", group.name)))?;

		tracing::debug!(group_id = %group.id, name = %group.name, "group created");
		Ok(())
	}

	/// Get a live group by ID.
	#[tracing::instrument(skip(self), fields(group_id = %id))]
	pub async fn get_group(&self, id: &GroupId) -> Result<Option<UserGroup>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {GROUP_COLUMNS} FROM user_groups g WHERE g.id = ? AND g.deleted_at IS NULL"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_group(&r)).transpose()
	}

	/// Get a live group by its exact name.
	#[tracing::instrument(skip(self))]
	pub async fn get_group_by_name(&self, name: &str) -> Result<Option<UserGroup>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {GROUP_COLUMNS} FROM user_groups g WHERE g.name = ? AND g.deleted_at IS NULL"
		))
		.bind(name)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_group(&r)).transpose()
	}

	/// List every live group, admin groups first, then by name.
	#[tracing::instrument(skip(self))]
	pub async fn list_groups(&self) -> Result<Vec<UserGroup>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {GROUP_COLUMNS} FROM user_groups g WHERE g.deleted_at IS NULL ORDER BY g.is_admin DESC, g.name ASC"
		))
		.fetch_all(&self.pool)
		.await?;

		let groups: Result<Vec<_>, _> = rows.iter().map(row_to_group).collect();
		let groups = groups?;
		tracing::debug!(count = groups.len(), "listed groups");
		Ok(groups)
	}

	/// Update a group's name and description.
	///
	/// `is_admin` and `is_system` are never written after creation.
	#[tracing::instrument(skip(self, group), fields(group_id = %group.id))]
	pub async fn update_group(&self, group: &UserGroup) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE user_groups
			SET name = ?, description = ?, updated_at = ?
			WHERE id = ? AND deleted_at IS NULL
			"#,
		)
		.bind(&group.name)
		.bind(&group.description)
		.bind(now)
		.bind(group.id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, format!("group name '{}' already exists", group.name)))?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("group {}", group.id)));
		}

		tracing::debug!(group_id = %group.id, "group updated");
		Ok(())
	}

	/// Soft-delete a group. Returns false if it was already gone.
	#[tracing::instrument(skip(self), fields(group_id = %id))]
	pub async fn soft_delete_group(&self, id: &GroupId) -> Result<bool, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE user_groups
			SET deleted_at = ?, updated_at = ?
			WHERE id = ? AND deleted_at IS NULL
			"#,
		)
		.bind(&now)
		.bind(&now)
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		let deleted = result.rows_affected() > 0;
		tracing::debug!(group_id = %id, deleted, "group soft-deleted");
		Ok(deleted)
	}

	// =========================================================================
	// Default groups
	// =========================================================================

	/// Find the live system group with the given admin flag.
	#[tracing::instrument(skip(self))]
	pub async fn find_system_group(&self, is_admin: bool) -> Result<Option<UserGroup>, DbError> {
		let row = sqlx::query(&format!(
			r#"
			SELECT {GROUP_COLUMNS} FROM user_groups g
			WHERE g.is_system = 1 AND g.is_admin = ? AND g.deleted_at IS NULL
			ORDER BY g.created_at ASC
			LIMIT 1
			"#
		))
		.bind(is_admin as i32)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_group(&r)).transpose()
	}

	/// Return the system group matching `template`'s admin flag, creating it
	/// from `template` when absent.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if an ordinary group already holds the
	/// template's name.
	#[tracing::instrument(skip(self, template), fields(name = %template.name, is_admin = template.is_admin))]
	pub async fn ensure_system_group(&self, template: &UserGroup) -> Result<UserGroup, DbError> {
		if let Some(existing) = self.find_system_group(template.is_admin).await? {
			return Ok(existing);
		}

		if self.get_group_by_name(&template.name).await?.is_some() {
			return Err(DbError::Conflict(format!(
				"cannot create default group '{}': an ordinary group already uses this name",
				template.name
			)));
		}

		self.create_group(template).await?;
		tracing::info!(group_id = %template.id, name = %template.name, "default group created");
		Ok(template.clone())
	}

	// =========================================================================
	// Membership
	// =========================================================================

	/// List the live groups a user belongs to, ordered by name.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_groups_for_user(&self, user_id: &UserId) -> Result<Vec<UserGroup>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {GROUP_COLUMNS}
			FROM user_groups g
			INNER JOIN user_group_members m ON g.id = m.group_id
			WHERE m.user_id = ? AND g.deleted_at IS NULL
			ORDER BY g.name ASC
			"#
		))
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		let groups: Result<Vec<_>, _> = rows.iter().map(row_to_group).collect();
		let groups = groups?;
		tracing::debug!(user_id = %user_id, count = groups.len(), "listed groups for user");
		Ok(groups)
	}

	/// List live groups for many users in one query.
	#[tracing::instrument(skip(self, user_ids), fields(users = user_ids.len()))]
	pub async fn list_groups_for_users(
		&self,
		user_ids: &[UserId],
	) -> Result<HashMap<UserId, Vec<UserGroup>>, DbError> {
		let mut by_user: HashMap<UserId, Vec<UserGroup>> = HashMap::new();
		if user_ids.is_empty() {
			return Ok(by_user);
		}

		let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
			"SELECT m.user_id AS member_id, {GROUP_COLUMNS} FROM user_groups g \
			 INNER JOIN user_group_members m ON g.id = m.group_id \
			 WHERE g.deleted_at IS NULL AND m.user_id IN ("
		));
		let mut separated = builder.separated(", ");
		for id in user_ids {
			separated.push_bind(id.to_string());
		}
		separated.push_unseparated(") ORDER BY g.name ASC");

		let rows = builder.build().fetch_all(&self.pool).await?;
		for row in &rows {
			let user_id: UserId = columns::id(row, "member_id")?;
			by_user.entry(user_id).or_default().push(row_to_group(row)?);
		}
		Ok(by_user)
	}

	/// Add a user to a group.
	///
	/// Idempotent: when the membership already exists it is returned
	/// unchanged with `false`.
	#[tracing::instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
	pub async fn add_member(
		&self,
		group_id: &GroupId,
		user_id: &UserId,
	) -> Result<(GroupMembership, bool), DbError> {
		let membership = GroupMembership::new(*group_id, *user_id);
		let result = sqlx::query(
			r#"
			INSERT INTO user_group_members (id, group_id, user_id, created_at)
			VALUES (?, ?, ?, ?)
			ON CONFLICT(group_id, user_id) DO NOTHING
			"#,
		)
		.bind(membership.id.to_string())
		.bind(group_id.to_string())
		.bind(user_id.to_string())
		.bind(membership.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;
		let created = result.rows_affected() > 0;

		let row = sqlx::query(
			r#"
			SELECT id, group_id, user_id, created_at
			FROM user_group_members
			WHERE group_id = ? AND user_id = ?
			"#,
		)
		.bind(group_id.to_string())
		.bind(user_id.to_string())
		.fetch_one(&self.pool)
		.await?;

		let stored = row_to_membership(&row)?;
		tracing::debug!(group_id = %group_id, user_id = %user_id, created, "group member added");
		Ok((stored, created))
	}

	/// Remove a user from a group. Returns false if they were not a member.
	#[tracing::instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
	pub async fn remove_member(&self, group_id: &GroupId, user_id: &UserId) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			DELETE FROM user_group_members
			WHERE group_id = ? AND user_id = ?
			"#,
		)
		.bind(group_id.to_string())
		.bind(user_id.to_string())
		.execute(&self.pool)
		.await?;

		let removed = result.rows_affected() > 0;
		tracing::debug!(group_id = %group_id, user_id = %user_id, removed, "group member removed");
		Ok(removed)
	}

	#[tracing::instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
	pub async fn is_member(&self, group_id: &GroupId, user_id: &UserId) -> Result<bool, DbError> {
		let row = sqlx::query(
			r#"
			SELECT 1 FROM user_group_members
			WHERE group_id = ? AND user_id = ?
			"#,
		)
		.bind(group_id.to_string())
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.is_some())
	}

	/// List the active users in a group, in order of joining.
	#[tracing::instrument(skip(self), fields(group_id = %group_id))]
	pub async fn list_members(&self, group_id: &GroupId) -> Result<Vec<User>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT u.id, u.email, u.nickname, u.avatar_url, u.created_at, u.updated_at, u.deleted_at
			FROM user_group_members m
			INNER JOIN users u ON m.user_id = u.id
			WHERE m.group_id = ? AND u.deleted_at IS NULL
			ORDER BY m.created_at ASC
			"#,
		)
		.bind(group_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		let members: Result<Vec<_>, _> = rows.iter().map(crate::user::row_to_user).collect();
		let members = members?;
		tracing::debug!(group_id = %group_id, count = members.len(), "listed group members");
		Ok(members)
	}

	/// Add every active user that has no live group membership to `group_id`.
	///
	/// Returns the number of users enrolled.
	#[tracing::instrument(skip(self), fields(group_id = %group_id))]
	pub async fn enroll_ungrouped_users(&self, group_id: &GroupId) -> Result<u64, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT u.id FROM users u
			WHERE u.deleted_at IS NULL
			AND NOT EXISTS (
				SELECT 1 FROM user_group_members m
				INNER JOIN user_groups g ON g.id = m.group_id
				WHERE m.user_id = u.id AND g.deleted_at IS NULL
			)
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		let mut tx = self.pool.begin().await?;
		let mut enrolled = 0u64;
		for row in &rows {
			let user_id: UserId = columns::id(row, "id")?;
			let result = sqlx::query(
				r#"
				INSERT INTO user_group_members (id, group_id, user_id, created_at)
				VALUES (?, ?, ?, ?)
				ON CONFLICT(group_id, user_id) DO NOTHING
				"#,
			)
			.bind(MembershipId::generate().to_string())
			.bind(group_id.to_string())
			.bind(user_id.to_string())
			.bind(Utc::now().to_rfc3339())
			.execute(&mut *tx)
			.await?;
			enrolled += result.rows_affected();
		}
		tx.commit().await?;

		tracing::info!(group_id = %group_id, enrolled, "enrolled ungrouped users");
		Ok(enrolled)
	}
}

pub(crate) fn row_to_group(row: &sqlx::sqlite::SqliteRow) -> Result<UserGroup, DbError> {
	Ok(UserGroup {
		id: columns::id(row, "id")?,
		name: row.get("name"),
		description: row.get("description"),
		is_admin: columns::flag(row, "is_admin"),
		is_system: columns::flag(row, "is_system"),
		created_at: columns::timestamp(row, "created_at")?,
		updated_at: columns::timestamp(row, "updated_at")?,
		deleted_at: columns::optional_timestamp(row, "deleted_at"),
	})
}

fn row_to_membership(row: &sqlx::sqlite::SqliteRow) -> Result<GroupMembership, DbError> {
	Ok(GroupMembership {
		id: columns::id(row, "id")?,
		group_id: columns::id(row, "group_id")?,
		user_id: columns::id(row, "user_id")?,
		created_at: columns::timestamp(row, "created_at")?,
	})
}

#[async_trait]
impl GroupStore for GroupRepository {
	async fn create_group(&self, group: &UserGroup) -> Result<(), DbError> {
		self.create_group(group).await
	}

	async fn get_group(&self, id: &GroupId) -> Result<Option<UserGroup>, DbError> {
		self.get_group(id).await
	}

	async fn get_group_by_name(&self, name: &str) -> Result<Option<UserGroup>, DbError> {
		self.get_group_by_name(name).await
	}

	async fn list_groups(&self) -> Result<Vec<UserGroup>, DbError> {
		self.list_groups().await
	}

	async fn update_group(&self, group: &UserGroup) -> Result<(), DbError> {
		self.update_group(group).await
	}

	async fn soft_delete_group(&self, id: &GroupId) -> Result<bool, DbError> {
		self.soft_delete_group(id).await
	}

	async fn find_system_group(&self, is_admin: bool) -> Result<Option<UserGroup>, DbError> {
		self.find_system_group(is_admin).await
	}

	async fn ensure_system_group(&self, template: &UserGroup) -> Result<UserGroup, DbError> {
		self.ensure_system_group(template).await
	}

	async fn list_groups_for_user(&self, user_id: &UserId) -> Result<Vec<UserGroup>, DbError> {
		self.list_groups_for_user(user_id).await
	}

	async fn list_groups_for_users(
		&self,
		user_ids: &[UserId],
	) -> Result<HashMap<UserId, Vec<UserGroup>>, DbError> {
		self.list_groups_for_users(user_ids).await
	}

	async fn add_member(
		&self,
		group_id: &GroupId,
		user_id: &UserId,
	) -> Result<(GroupMembership, bool), DbError> {
		self.add_member(group_id, user_id).await
	}

	async fn remove_member(&self, group_id: &GroupId, user_id: &UserId) -> Result<bool, DbError> {
		self.remove_member(group_id, user_id).await
	}

	async fn is_member(&self, group_id: &GroupId, user_id: &UserId) -> Result<bool, DbError> {
		self.is_member(group_id, user_id).await
	}

	async fn list_members(&self, group_id: &GroupId) -> Result<Vec<User>, DbError> {
		self.list_members(group_id).await
	}

	async fn enroll_ungrouped_users(&self, group_id: &GroupId) -> Result<u64, DbError> {
		self.enroll_ungrouped_users(group_id).await
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Enterprise administration handlers: user directory and knowledge bases.
//!
//! Mounted under `/api/rbac/admin` only in enterprise mode. The subtree is
//! guarded by the admin layer; the extractors repeat the check so a handler
//! is never reachable by a non-admin however it is mounted.

use std::collections::HashMap;

use axum::{
	extract::{Path, Query, State},
	response::IntoResponse,
};
use ragward_server_api::{
	AdminUserResponse, DeletedResponse, KnowledgeBaseResponse, ListUsersParams, ListUsersResponse,
	RbacErrorResponse,
};
use ragward_server_auth::UserId;

use crate::{
	api::AppState,
	api_response::{ok, ok_with_message},
	auth_middleware::RequireAdmin,
	convert::{admin_user_response, kb_response},
	error::ServerError,
	validation::parse_id,
};

#[utoipa::path(
    get,
    path = "/api/rbac/admin/users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "One page of users", body = ListUsersResponse),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse)
    ),
    tag = "admin"
)]
/// List users with their groups, paginated and optionally filtered by a
/// search over email and nickname.
#[tracing::instrument(skip(state, admin), fields(actor_id = %admin.id()))]
pub async fn list_users(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse, ServerError> {
	let page = params.page_clamped();
	let page_size = params.page_size_clamped();
	let search = params
		.search
		.as_deref()
		.map(str::trim)
		.filter(|s| !s.is_empty());

	let (users, total) = state
		.user_repo
		.list_users(search, i64::from(page_size), params.offset())
		.await?;

	let ids: Vec<UserId> = users.iter().map(|u| u.id).collect();
	let mut groups = if ids.is_empty() {
		HashMap::new()
	} else {
		state.group_repo.list_groups_for_users(&ids).await?
	};

	let users: Vec<AdminUserResponse> = users
		.iter()
		.map(|user| {
			let user_groups = groups.remove(&user.id).unwrap_or_default();
			admin_user_response(user, &user_groups)
		})
		.collect();

	Ok(ok(ListUsersResponse {
		users,
		total,
		page,
		page_size,
	}))
}

#[utoipa::path(
    delete,
    path = "/api/rbac/admin/user/{user_id}",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = DeletedResponse),
        (status = 400, description = "Cannot delete yourself", body = RbacErrorResponse),
        (status = 403, description = "Target is an administrator", body = RbacErrorResponse),
        (status = 404, description = "User not found", body = RbacErrorResponse)
    ),
    tag = "admin"
)]
/// Soft-delete a user and revoke their token.
///
/// Administrators cannot delete themselves or other administrators.
#[tracing::instrument(skip(state, admin), fields(actor_id = %admin.id(), %user_id))]
pub async fn delete_user(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let user_id: UserId = parse_id(&user_id, "user")?;
	if user_id == admin.id() {
		return Err(ServerError::BadRequest(
			"You cannot delete your own account".to_string(),
		));
	}

	let user = state
		.user_repo
		.get_user_by_id(&user_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

	let groups = state.group_repo.list_groups_for_user(&user.id).await?;
	if groups.iter().any(|g| g.is_admin) {
		return Err(ServerError::Forbidden(
			"Administrators cannot be deleted".to_string(),
		));
	}

	let deleted = state.user_repo.soft_delete_user(&user.id).await?;
	if !deleted {
		return Err(ServerError::NotFound("User not found".to_string()));
	}

	tracing::info!(user_id = %user.id, "user deleted");
	Ok(ok_with_message(DeletedResponse { deleted }, "User deleted"))
}

#[utoipa::path(
    get,
    path = "/api/rbac/admin/kbs",
    responses(
        (status = 200, description = "Every live knowledge base", body = [KnowledgeBaseResponse]),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse)
    ),
    tag = "admin"
)]
/// List every live knowledge base, ordered by name.
#[tracing::instrument(skip(state, admin), fields(actor_id = %admin.id()))]
pub async fn list_kbs(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
	let kbs = state.kb_repo.list_kbs().await?;
	let kbs: Vec<KnowledgeBaseResponse> = kbs.iter().map(kb_response).collect();
	Ok(ok(kbs))
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Knowledge base grant HTTP handlers.
//!
//! Grants are per (group, knowledge base) pair. A user's effective access
//! is the OR of the grants held by all of their live groups, and members of
//! an admin group hold every capability on every knowledge base.

use axum::{
	extract::{Path, State},
	response::IntoResponse,
};
use chrono::Utc;
use ragward_server_api::{
	DeletedResponse, KbAccessResponse, KbPermissionResponse, MyPermissionsResponse,
	RbacErrorResponse, SetKbPermissionRequest, UpdateKbPermissionRequest,
};
use ragward_server_auth::{resolve, GroupId, KbAccess, KbId, KnowledgeBase, PermissionId};

use crate::{
	api::AppState,
	api_response::{ok, ok_with_message},
	auth_middleware::{RequireAdmin, RequireAuth},
	convert::{kb_access_response, my_group_response, permission_response, resolved_response},
	error::ServerError,
	validation::parse_id,
};

async fn load_kb(state: &AppState, kb_id: &KbId) -> Result<KnowledgeBase, ServerError> {
	state
		.kb_repo
		.get_kb(kb_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Knowledge base not found".to_string()))
}

#[utoipa::path(
    post,
    path = "/api/rbac/permission/kb",
    request_body = SetKbPermissionRequest,
    responses(
        (status = 200, description = "Grant stored", body = KbPermissionResponse),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse),
        (status = 404, description = "Group or knowledge base not found", body = RbacErrorResponse)
    ),
    tag = "permissions"
)]
/// Set a group's grant on a knowledge base.
///
/// Setting a grant for a pair that already has one replaces its flags.
#[tracing::instrument(skip(state, admin, payload), fields(actor_id = %admin.id(), group_id = %payload.group_id, kb_id = %payload.kb_id))]
pub async fn set_permission(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	axum::Json(payload): axum::Json<SetKbPermissionRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let group_id = GroupId::new(payload.group_id);
	let kb_id = KbId::new(payload.kb_id);

	let group = state
		.group_repo
		.get_group(&group_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Group not found".to_string()))?;
	let kb = load_kb(&state, &kb_id).await?;

	let access = KbAccess {
		can_read: payload.can_read,
		can_update: payload.can_update,
		can_delete: payload.can_delete,
		can_create: payload.can_create,
	};
	let permission = state
		.permission_repo
		.set_permission(&group.id, &kb.id, access)
		.await?;

	tracing::info!(permission_id = %permission.id, group_id = %group.id, kb_id = %kb.id, "kb permission set");
	Ok(ok_with_message(
		permission_response(&permission, Some(group.name)),
		"Permission saved",
	))
}

#[utoipa::path(
    put,
    path = "/api/rbac/permission/kb/{id}",
    params(("id" = String, Path, description = "Permission ID")),
    request_body = UpdateKbPermissionRequest,
    responses(
        (status = 200, description = "Grant updated", body = KbPermissionResponse),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse),
        (status = 404, description = "Permission not found", body = RbacErrorResponse)
    ),
    tag = "permissions"
)]
/// Update some of a grant's flags; omitted flags keep their value.
#[tracing::instrument(skip(state, admin, payload), fields(actor_id = %admin.id(), permission_id = %id))]
pub async fn update_permission(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	Path(id): Path<String>,
	axum::Json(payload): axum::Json<UpdateKbPermissionRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let id: PermissionId = parse_id(&id, "permission")?;
	let mut permission = state
		.permission_repo
		.get_permission(&id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Permission not found".to_string()))?;

	let current = permission.access;
	permission.access = KbAccess {
		can_read: payload.can_read.unwrap_or(current.can_read),
		can_update: payload.can_update.unwrap_or(current.can_update),
		can_delete: payload.can_delete.unwrap_or(current.can_delete),
		can_create: payload.can_create.unwrap_or(current.can_create),
	};

	if !state
		.permission_repo
		.update_permission(&id, permission.access)
		.await?
	{
		return Err(ServerError::NotFound("Permission not found".to_string()));
	}
	permission.updated_at = Utc::now();

	let group_name = state
		.group_repo
		.get_group(&permission.group_id)
		.await?
		.map(|group| group.name);

	tracing::info!(permission_id = %id, "kb permission updated");
	Ok(ok_with_message(
		permission_response(&permission, group_name),
		"Permission updated",
	))
}

#[utoipa::path(
    delete,
    path = "/api/rbac/permission/kb/{id}",
    params(("id" = String, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Grant removed", body = DeletedResponse),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse),
        (status = 404, description = "Permission not found", body = RbacErrorResponse)
    ),
    tag = "permissions"
)]
/// Remove a grant.
#[tracing::instrument(skip(state, admin), fields(actor_id = %admin.id(), permission_id = %id))]
pub async fn delete_permission(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let id: PermissionId = parse_id(&id, "permission")?;
	let deleted = state.permission_repo.delete_permission(&id).await?;
	if !deleted {
		return Err(ServerError::NotFound("Permission not found".to_string()));
	}

	tracing::info!(permission_id = %id, "kb permission deleted");
	Ok(ok_with_message(DeletedResponse { deleted }, "Permission deleted"))
}

#[utoipa::path(
    get,
    path = "/api/rbac/permission/kb/{id}/list",
    params(("id" = String, Path, description = "Knowledge base ID")),
    responses(
        (status = 200, description = "Grants on the knowledge base", body = [KbPermissionResponse]),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse),
        (status = 404, description = "Knowledge base not found", body = RbacErrorResponse)
    ),
    tag = "permissions"
)]
/// List every live group's grant on a knowledge base, ordered by group name.
#[tracing::instrument(skip(state, admin), fields(actor_id = %admin.id(), kb_id = %id))]
pub async fn list_kb_permissions(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let kb_id: KbId = parse_id(&id, "knowledge base")?;
	let kb = load_kb(&state, &kb_id).await?;

	let rows = state.permission_repo.list_for_kb(&kb.id).await?;
	let rows: Vec<KbPermissionResponse> = rows
		.into_iter()
		.map(|row| permission_response(&row.permission, Some(row.group_name)))
		.collect();
	Ok(ok(rows))
}

#[utoipa::path(
    get,
    path = "/api/rbac/group/{group_id}/permissions",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Grants held by the group", body = [KbPermissionResponse]),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse),
        (status = 404, description = "Group not found", body = RbacErrorResponse)
    ),
    tag = "permissions"
)]
/// List a group's grants in creation order, naming each knowledge base.
#[tracing::instrument(skip(state, admin), fields(actor_id = %admin.id(), group_id = %group_id))]
pub async fn list_group_permissions(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	Path(group_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let group_id: GroupId = parse_id(&group_id, "group")?;
	let group = state
		.group_repo
		.get_group(&group_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Group not found".to_string()))?;

	let rows = state.permission_repo.list_for_group(&group.id).await?;
	let rows: Vec<KbPermissionResponse> = rows
		.into_iter()
		.map(|row| KbPermissionResponse {
			kb_name: Some(row.kb_name),
			..permission_response(&row.permission, Some(group.name.clone()))
		})
		.collect();
	Ok(ok(rows))
}

#[utoipa::path(
    get,
    path = "/api/rbac/permission/my",
    responses(
        (status = 200, description = "The caller's resolved permissions", body = MyPermissionsResponse),
        (status = 401, description = "Not authenticated", body = RbacErrorResponse)
    ),
    tag = "permissions"
)]
/// The caller's groups and one resolved row per accessible knowledge base.
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.id()))]
pub async fn my_permissions(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
	let kbs = state.kb_repo.list_kbs().await?;
	let subject = &current_user.subject;

	let rows = resolve::resolve_all(subject, &kbs);
	let response = MyPermissionsResponse {
		user_id: current_user.id().into_inner(),
		is_admin: subject.is_admin(),
		groups: subject.groups.iter().map(my_group_response).collect(),
		kb_permissions: rows.iter().map(resolved_response).collect(),
	};
	Ok(ok(response))
}

#[utoipa::path(
    get,
    path = "/api/rbac/permission/kb/{id}/mine",
    params(("id" = String, Path, description = "Knowledge base ID")),
    responses(
        (status = 200, description = "The caller's access on the knowledge base", body = KbAccessResponse),
        (status = 404, description = "Knowledge base not found", body = RbacErrorResponse)
    ),
    tag = "permissions"
)]
/// The caller's resolved access on a single knowledge base.
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.id(), kb_id = %id))]
pub async fn my_kb_access(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let kb_id: KbId = parse_id(&id, "knowledge base")?;
	let kb = load_kb(&state, &kb_id).await?;

	let subject = &current_user.subject;
	let access = resolve::kb_access(subject, kb.id);
	Ok(ok(kb_access_response(kb.id, subject.is_admin(), access)))
}

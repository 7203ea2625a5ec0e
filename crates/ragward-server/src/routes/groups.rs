// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Group management HTTP handlers.
//!
//! Groups are created, renamed and deleted by administrators. The two
//! default groups are protected by their `is_system`/`is_admin` flags, so a
//! renamed default group stays undeletable and a look-alike name gains
//! nothing.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
};
use chrono::Utc;
use ragward_server_api::{
	CreateGroupRequest, DeletedResponse, GroupResponse, ListGroupsParams, RbacErrorResponse,
	UpdateGroupRequest,
};
use ragward_server_auth::{GroupId, UserGroup};

use crate::{
	api::AppState,
	api_response::{ok, ok_with_message},
	auth_middleware::{RequireAdmin, RequireAuth},
	convert::group_response,
	error::ServerError,
	validation::{normalize_description, parse_id, validate_group_name},
};

#[utoipa::path(
    post,
    path = "/api/rbac/group/create",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupResponse),
        (status = 400, description = "Invalid group name", body = RbacErrorResponse),
        (status = 401, description = "Not authenticated", body = RbacErrorResponse),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse),
        (status = 409, description = "Name already in use", body = RbacErrorResponse)
    ),
    tag = "groups"
)]
/// Create a group.
///
/// The name is trimmed and must be unique among live groups. Only the
/// admin flag is taken from the request; `is_system` is reserved for the
/// default groups.
#[tracing::instrument(skip(state, admin, payload), fields(actor_id = %admin.id(), name = %payload.name))]
pub async fn create_group(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	axum::Json(payload): axum::Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let name = validate_group_name(&payload.name)?;
	if state.group_repo.get_group_by_name(&name).await?.is_some() {
		return Err(ServerError::Conflict(format!("Group '{name}' already exists")));
	}

	let group = UserGroup::new(name, normalize_description(payload.description), payload.is_admin);
	state.group_repo.create_group(&group).await?;

	tracing::info!(group_id = %group.id, is_admin = group.is_admin, "group created");
	Ok((
		StatusCode::CREATED,
		ok_with_message(group_response(&group), "Group created"),
	))
}

#[utoipa::path(
    put,
    path = "/api/rbac/group/{group_id}",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Group updated", body = GroupResponse),
        (status = 400, description = "Invalid name or ID", body = RbacErrorResponse),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse),
        (status = 404, description = "Group not found", body = RbacErrorResponse),
        (status = 409, description = "Name already in use", body = RbacErrorResponse)
    ),
    tag = "groups"
)]
/// Rename a group or change its description.
///
/// `is_admin` and `is_system` are fixed at creation and never change here.
#[tracing::instrument(skip(state, admin, payload), fields(actor_id = %admin.id(), %group_id))]
pub async fn update_group(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	Path(group_id): Path<String>,
	axum::Json(payload): axum::Json<UpdateGroupRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let group_id: GroupId = parse_id(&group_id, "group")?;
	let mut group = state
		.group_repo
		.get_group(&group_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Group not found".to_string()))?;

	if let Some(raw) = payload.name.as_deref() {
		let name = validate_group_name(raw)?;
		if let Some(existing) = state.group_repo.get_group_by_name(&name).await? {
			if existing.id != group.id {
				return Err(ServerError::Conflict(format!("Group '{name}' already exists")));
			}
		}
		group.name = name;
	}
	if payload.description.is_some() {
		group.description = normalize_description(payload.description);
	}
	group.updated_at = Utc::now();

	state.group_repo.update_group(&group).await?;
	tracing::info!(group_id = %group.id, "group updated");
	Ok(ok_with_message(group_response(&group), "Group updated"))
}

#[utoipa::path(
    delete,
    path = "/api/rbac/group/{group_id}",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group deleted", body = DeletedResponse),
        (status = 403, description = "Protected group or not an administrator", body = RbacErrorResponse),
        (status = 404, description = "Group not found", body = RbacErrorResponse)
    ),
    tag = "groups"
)]
/// Soft-delete a group.
///
/// Protected groups (`is_system` or `is_admin`) cannot be deleted.
#[tracing::instrument(skip(state, admin), fields(actor_id = %admin.id(), %group_id))]
pub async fn delete_group(
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

	if group.is_protected() {
		tracing::warn!(group_id = %group.id, name = %group.name, "refused to delete protected group");
		return Err(ServerError::Forbidden(format!(
			"Group '{}' is protected and cannot be deleted",
			group.name
		)));
	}

	let deleted = state.group_repo.soft_delete_group(&group.id).await?;
	if !deleted {
		return Err(ServerError::NotFound("Group not found".to_string()));
	}

	tracing::info!(group_id = %group.id, "group deleted");
	Ok(ok_with_message(DeletedResponse { deleted }, "Group deleted"))
}

#[utoipa::path(
    get,
    path = "/api/rbac/group/list",
    params(ListGroupsParams),
    responses(
        (status = 200, description = "Groups visible to the caller", body = [GroupResponse]),
        (status = 401, description = "Not authenticated", body = RbacErrorResponse)
    ),
    tag = "groups"
)]
/// List groups.
///
/// Administrators passing `all=true` see every live group; everyone else
/// sees the groups they belong to.
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.id(), all = params.all))]
pub async fn list_groups(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(params): Query<ListGroupsParams>,
) -> Result<impl IntoResponse, ServerError> {
	let groups = if params.all && current_user.is_admin() {
		state.group_repo.list_groups().await?
	} else {
		state.group_repo.list_groups_for_user(&current_user.id()).await?
	};

	let groups: Vec<GroupResponse> = groups.iter().map(group_response).collect();
	Ok(ok(groups))
}

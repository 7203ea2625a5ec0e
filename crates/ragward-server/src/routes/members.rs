// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Group membership HTTP handlers.

use axum::{
	extract::{Path, State},
	response::IntoResponse,
};
use ragward_server_api::{
	AddMemberRequest, DeletedResponse, GroupMemberResponse, MembershipResponse, RbacErrorResponse,
};
use ragward_server_auth::{GroupId, UserGroup, UserId};

use crate::{
	api::AppState,
	api_response::{ok, ok_with_message},
	auth_middleware::{RequireAdmin, RequireAuth},
	convert::member_response,
	error::ServerError,
	validation::parse_id,
};

async fn load_group(state: &AppState, group_id: &GroupId) -> Result<UserGroup, ServerError> {
	state
		.group_repo
		.get_group(group_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("Group not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/rbac/group/{group_id}/members",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Live members of the group", body = [GroupMemberResponse]),
        (status = 403, description = "Neither an administrator nor a member", body = RbacErrorResponse),
        (status = 404, description = "Group not found", body = RbacErrorResponse)
    ),
    tag = "members"
)]
/// List the members of a group. Allowed for administrators and members.
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.id(), %group_id))]
pub async fn list_members(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(group_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	let group_id: GroupId = parse_id(&group_id, "group")?;
	let group = load_group(&state, &group_id).await?;

	if !current_user.is_admin() && !current_user.subject.is_member_of(group.id) {
		return Err(ServerError::Forbidden(
			"You are not a member of this group".to_string(),
		));
	}

	let members = state.group_repo.list_members(&group.id).await?;
	let members: Vec<GroupMemberResponse> = members.iter().map(member_response).collect();
	Ok(ok(members))
}

#[utoipa::path(
    post,
    path = "/api/rbac/group/{group_id}/member",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = AddMemberRequest,
    responses(
        (status = 200, description = "User is a member", body = MembershipResponse),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse),
        (status = 404, description = "Group or user not found", body = RbacErrorResponse)
    ),
    tag = "members"
)]
/// Add a user to a group. Adding an existing member is a no-op.
#[tracing::instrument(skip(state, admin, payload), fields(actor_id = %admin.id(), %group_id, user_id = %payload.user_id))]
pub async fn add_member(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	Path(group_id): Path<String>,
	axum::Json(payload): axum::Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let group_id: GroupId = parse_id(&group_id, "group")?;
	let group = load_group(&state, &group_id).await?;
	let user_id = UserId::new(payload.user_id);
	let user = state
		.user_repo
		.get_user_by_id(&user_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

	let (membership, created) = state.group_repo.add_member(&group.id, &user.id).await?;
	if created {
		tracing::info!(group_id = %group.id, user_id = %user.id, "member added");
	}

	let message = if created {
		"Member added"
	} else {
		"User is already a member"
	};
	Ok(ok_with_message(
		MembershipResponse {
			membership_id: membership.id.into_inner(),
			user_id: user.id.into_inner(),
			group_id: group.id.into_inner(),
			created,
		},
		message,
	))
}

#[utoipa::path(
    delete,
    path = "/api/rbac/group/{group_id}/member/{user_id}",
    params(
        ("group_id" = String, Path, description = "Group ID"),
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = DeletedResponse),
        (status = 403, description = "Not an administrator", body = RbacErrorResponse),
        (status = 404, description = "Group not found or user not a member", body = RbacErrorResponse)
    ),
    tag = "members"
)]
/// Remove a user from a group.
#[tracing::instrument(skip(state, admin), fields(actor_id = %admin.id(), %group_id, %user_id))]
pub async fn remove_member(
	RequireAdmin(admin): RequireAdmin,
	State(state): State<AppState>,
	Path((group_id, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
	let group_id: GroupId = parse_id(&group_id, "group")?;
	let user_id: UserId = parse_id(&user_id, "user")?;
	let group = load_group(&state, &group_id).await?;

	let deleted = state.group_repo.remove_member(&group.id, &user_id).await?;
	if !deleted {
		return Err(ServerError::NotFound(
			"User is not a member of this group".to_string(),
		));
	}

	tracing::info!(group_id = %group.id, %user_id, "member removed");
	Ok(ok_with_message(DeletedResponse { deleted }, "Member removed"))
}

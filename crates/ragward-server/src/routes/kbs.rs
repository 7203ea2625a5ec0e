// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Knowledge base discovery for the current user.

use std::collections::HashSet;

use axum::{
	extract::{Query, State},
	response::IntoResponse,
};
use ragward_server_api::{AccessibleKbsParams, AccessibleKbsResponse, RbacErrorResponse};
use ragward_server_auth::{resolve, KbId};

use crate::{
	api::AppState,
	api_response::ok,
	auth_middleware::RequireAuth,
	error::ServerError,
	validation::parse_permission_kind,
};

#[utoipa::path(
    get,
    path = "/api/rbac/kb/accessible",
    params(AccessibleKbsParams),
    responses(
        (status = 200, description = "IDs of knowledge bases the caller holds the permission on", body = AccessibleKbsResponse),
        (status = 400, description = "Unknown permission kind", body = RbacErrorResponse),
        (status = 401, description = "Not authenticated", body = RbacErrorResponse)
    ),
    tag = "permissions"
)]
/// List the live knowledge bases on which the caller holds `permission`
/// (default `read`).
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.id()))]
pub async fn accessible_kbs(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(params): Query<AccessibleKbsParams>,
) -> Result<impl IntoResponse, ServerError> {
	let kind = parse_permission_kind(params.permission.as_deref())?;
	let kbs = state.kb_repo.list_kbs().await?;
	let live: HashSet<KbId> = kbs.iter().map(|kb| kb.id).collect();

	let kb_ids = resolve::accessible_kb_ids(&current_user.subject, kind, &kbs)
		.into_iter()
		.filter(|id| live.contains(id))
		.map(KbId::into_inner)
		.collect();

	Ok(ok(AccessibleKbsResponse {
		permission: kind.to_string(),
		kb_ids,
	}))
}

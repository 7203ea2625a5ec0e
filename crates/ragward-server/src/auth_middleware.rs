// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! Bearer tokens are hashed with SHA-256 before lookup; raw tokens are never
//! stored or logged. On success the user's live groups and their grants are
//! loaded once per request into a [`CurrentUser`], so handlers answer
//! authorization questions without further queries.
//!
//! Use [`RequireAuth`] in handlers any signed-in user may call and
//! [`RequireAdmin`] where membership in an admin group is required.

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::{IntoResponse, Response},
};
use ragward_server_api::RbacErrorResponse;
use ragward_server_auth::{extract_bearer_token, hash_token, AuthContext, CurrentUser, PermissionSubject};
use ragward_server_db::DbError;
use tracing::instrument;

use crate::{
	api::AppState,
	api_response::{forbidden, internal_error, unauthorized},
};

/// Authentication middleware that extracts auth context from requests.
///
/// Stores an [`AuthContext`] as a request extension. Requests without a
/// valid token get an unauthenticated context; the extractors decide
/// whether that is acceptable.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(user_id = tracing::field::Empty)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let auth_ctx = match extract_bearer_token(request.headers()) {
		Some(token) => match authenticate_token(&state, &token).await {
			Ok(Some(current_user)) => {
				tracing::Span::current().record("user_id", tracing::field::display(current_user.id()));
				AuthContext::authenticated(current_user)
			}
			Ok(None) => {
				tracing::debug!("bearer token did not match an active user");
				AuthContext::unauthenticated()
			}
			Err(e) => {
				tracing::error!(error = %e, "failed to authenticate bearer token");
				return internal_error::<RbacErrorResponse>("Failed to authenticate request")
					.into_response();
			}
		},
		None => AuthContext::unauthenticated(),
	};

	request.extensions_mut().insert(auth_ctx);
	next.run(request).await
}

/// Resolve a raw bearer token to the user and their permission subject.
async fn authenticate_token(state: &AppState, token: &str) -> Result<Option<CurrentUser>, DbError> {
	let token_hash = hash_token(token);
	let Some(user) = state.user_repo.get_user_by_token_hash(&token_hash).await? else {
		return Ok(None);
	};

	let groups = state.group_repo.list_groups_for_user(&user.id).await?;
	let group_ids: Vec<_> = groups.iter().map(|g| g.id).collect();
	let grants = state.permission_repo.list_for_groups(&group_ids).await?;

	let subject = PermissionSubject::new(user.id, groups, grants);
	Ok(Some(CurrentUser::new(user, subject)))
}

/// Guard for a whole subtree: rejects requests that are not from an admin.
pub async fn require_admin_layer(request: Request<Body>, next: Next) -> Response {
	match current_auth(request.extensions().get::<AuthContext>()).current_user {
		Some(user) if user.is_admin() => next.run(request).await,
		Some(user) => {
			tracing::debug!(user_id = %user.id(), "admin route refused");
			admin_required()
		}
		None => authentication_required(),
	}
}

fn current_auth(ctx: Option<&AuthContext>) -> AuthContext {
	ctx.cloned().unwrap_or_else(AuthContext::unauthenticated)
}

fn authentication_required() -> Response {
	unauthorized::<RbacErrorResponse>("unauthorized", "Authentication required").into_response()
}

fn admin_required() -> Response {
	forbidden::<RbacErrorResponse>("forbidden", "Administrator access required").into_response()
}

/// Extractor that requires authentication.
///
/// Returns 401 Unauthorized if the request is not authenticated.
///
/// # Example
///
/// ```ignore
/// async fn handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.user.nickname)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		match current_auth(parts.extensions.get::<AuthContext>()).current_user {
			Some(user) => Ok(RequireAuth(user)),
			None => {
				tracing::debug!("Authentication required: no valid credentials");
				Err(authentication_required())
			}
		}
	}
}

/// Extractor that requires membership in an admin group.
///
/// Returns 401 when unauthenticated and 403 for non-admins.
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
	S: Send + Sync,
{
	type Rejection = Response;

	#[instrument(name = "RequireAdmin::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		match current_auth(parts.extensions.get::<AuthContext>()).current_user {
			Some(user) if user.is_admin() => Ok(RequireAdmin(user)),
			Some(user) => {
				tracing::debug!(user_id = %user.id(), "Admin required: user is not an administrator");
				Err(admin_required())
			}
			None => Err(authentication_required()),
		}
	}
}

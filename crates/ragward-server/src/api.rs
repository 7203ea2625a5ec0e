// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and route table.

use std::sync::Arc;

use axum::{
	http::HeaderValue,
	middleware::{from_fn, from_fn_with_state},
	routing::{delete, get, post, put},
	Json, Router,
};
use ragward_server_config::{RbacConfig, ServerConfig};
use ragward_server_db::{
	GroupRepository, KnowledgeBaseRepository, PermissionRepository, UserRepository,
};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

use crate::{
	api_docs::ApiDoc,
	auth_middleware::{auth_layer, require_admin_layer},
	bootstrap::{ensure_default_groups, DefaultGroups},
	error::ServerError,
	routes,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub group_repo: Arc<GroupRepository>,
	pub user_repo: Arc<UserRepository>,
	pub kb_repo: Arc<KnowledgeBaseRepository>,
	pub permission_repo: Arc<PermissionRepository>,
	pub rbac_config: RbacConfig,
	pub default_groups: DefaultGroups,
}

impl AppState {
	/// Whether the enterprise-only admin routes are mounted.
	pub fn enterprise(&self) -> bool {
		self.rbac_config.enterprise
	}
}

/// Build repositories over `pool` and make sure the default groups exist.
pub async fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, ServerError> {
	let group_repo = Arc::new(GroupRepository::new(pool.clone()));
	let default_groups = ensure_default_groups(&group_repo, &config.rbac).await?;

	Ok(AppState {
		group_repo,
		user_repo: Arc::new(UserRepository::new(pool.clone())),
		kb_repo: Arc::new(KnowledgeBaseRepository::new(pool.clone())),
		permission_repo: Arc::new(PermissionRepository::new(pool.clone())),
		rbac_config: config.rbac.clone(),
		default_groups,
		pool,
	})
}

/// Build the full router.
///
/// Every route under `/api/rbac` passes through [`auth_layer`]. The
/// `/api/rbac/admin` subtree is only mounted when enterprise mode is on, and
/// is wrapped as a whole by [`require_admin_layer`].
pub fn create_router(state: AppState) -> Router {
	let mut rbac = Router::new()
		// Groups
		.route("/group/create", post(routes::groups::create_group))
		.route("/group/list", get(routes::groups::list_groups))
		.route(
			"/group/{group_id}",
			put(routes::groups::update_group).delete(routes::groups::delete_group),
		)
		// Members
		.route("/group/{group_id}/members", get(routes::members::list_members))
		.route("/group/{group_id}/member", post(routes::members::add_member))
		.route(
			"/group/{group_id}/permissions",
			get(routes::permissions::list_group_permissions),
		)
		.route(
			"/group/{group_id}/member/{user_id}",
			delete(routes::members::remove_member),
		)
		// Knowledge base grants
		.route("/permission/kb", post(routes::permissions::set_permission))
		.route(
			"/permission/kb/{id}",
			put(routes::permissions::update_permission).delete(routes::permissions::delete_permission),
		)
		.route(
			"/permission/kb/{id}/list",
			get(routes::permissions::list_kb_permissions),
		)
		.route("/permission/kb/{id}/mine", get(routes::permissions::my_kb_access))
		.route("/permission/my", get(routes::permissions::my_permissions))
		.route("/kb/accessible", get(routes::kbs::accessible_kbs));

	if state.enterprise() {
		let admin = Router::new()
			.route("/users", get(routes::admin::list_users))
			.route("/user/{user_id}", delete(routes::admin::delete_user))
			.route("/kbs", get(routes::admin::list_kbs))
			.route_layer(from_fn(require_admin_layer));
		rbac = rbac.nest("/admin", admin);
	}

	let rbac = rbac.layer(from_fn_with_state(state.clone(), auth_layer));

	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(openapi_json))
		.nest("/api/rbac", rbac)
		.with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
	Json(ApiDoc::openapi())
}

/// CORS policy from configured origins; an empty list or `*` allows any.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
	let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
	if origins.is_empty() || origins.iter().any(|o| o == "*") {
		return base.allow_origin(Any);
	}

	let parsed: Vec<HeaderValue> = origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(value) => Some(value),
			Err(_) => {
				tracing::warn!(%origin, "ignoring invalid CORS origin");
				None
			}
		})
		.collect();
	base.allow_origin(parsed)
}

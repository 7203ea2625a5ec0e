// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	response::Response,
	Router,
};
use ragward_server::{
	api::{create_app_state, create_router, AppState},
	ServerConfig,
};
use ragward_server_auth::{KbAccess, KbId, KnowledgeBase, User};
use ragward_server_db::testing::insert_user;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

#[derive(Clone)]
pub struct TestUser {
	pub user: User,
	pub token: String,
}

impl TestUser {
	pub fn auth_header(&self) -> String {
		format!("Bearer {}", self.token)
	}
}

#[derive(Clone)]
pub struct Fixtures {
	/// Member of the administrators group.
	pub admin: TestUser,
	/// Member of the default users group only.
	pub alice: TestUser,
	/// Member of the default users group only.
	pub bob: TestUser,
	pub docs: KnowledgeBase,
	pub wiki: KnowledgeBase,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	_temp_dir: TempDir,
}

impl TestApp {
	/// App with the enterprise admin routes mounted.
	pub async fn new() -> Self {
		Self::new_internal(true).await
	}

	pub async fn without_enterprise() -> Self {
		Self::new_internal(false).await
	}

	async fn new_internal(enterprise: bool) -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_rbac.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

		let pool = ragward_server_db::create_pool(&db_url).await.unwrap();
		ragward_server_db::run_migrations(&pool).await.unwrap();

		let mut config = ServerConfig::default();
		config.rbac.enterprise = enterprise;
		let state = create_app_state(pool, &config).await.unwrap();

		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			_temp_dir: temp_dir,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(&self, path: &str, user: Option<&TestUser>, body: impl Serialize) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn put(&self, path: &str, user: Option<&TestUser>, body: impl Serialize) -> Response<Body> {
		self.request(Method::PUT, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	/// GET and decode the envelope's `data` field, asserting 200.
	pub async fn get_data<T: DeserializeOwned>(&self, path: &str, user: &TestUser) -> T {
		let response = self.get(path, Some(user)).await;
		assert_eq!(response.status(), StatusCode::OK, "GET {path}");
		data(response).await
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			builder = builder.header(header::AUTHORIZATION, test_user.auth_header());
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header(header::CONTENT_TYPE, "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Create a user in the default users group.
	pub async fn create_user(&self, email: &str, nickname: &str) -> TestUser {
		create_member(&self.state, email, nickname, false).await
	}

	/// Create a knowledge base directly in the store.
	pub async fn create_kb(&self, name: &str) -> KnowledgeBase {
		let kb = KnowledgeBase::new(name);
		self.state.kb_repo.create_kb(&kb).await.unwrap();
		kb
	}

	/// Grant `access` on `kb_id` to a fresh group containing `user`.
	pub async fn grant_via_new_group(&self, group_name: &str, user: &TestUser, kb_id: KbId, access: KbAccess) {
		let group = ragward_server_auth::UserGroup::new(group_name, None, false);
		self.state.group_repo.create_group(&group).await.unwrap();
		self
			.state
			.group_repo
			.add_member(&group.id, &user.user.id)
			.await
			.unwrap();
		self
			.state
			.permission_repo
			.set_permission(&group.id, &kb_id, access)
			.await
			.unwrap();
	}
}

/// Read the full response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

/// Decode the envelope's `data` field.
pub async fn data<T: DeserializeOwned>(response: Response<Body>) -> T {
	let mut json = body_json(response).await;
	serde_json::from_value(json["data"].take()).unwrap()
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<Value>,
	pub expected_status: StatusCode,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PUT => {
				app.put(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}

async fn create_member(state: &AppState, email: &str, nickname: &str, admin: bool) -> TestUser {
	let user = insert_user(&state.pool, email, nickname).await.unwrap();
	state
		.group_repo
		.add_member(&state.default_groups.users, &user.id)
		.await
		.unwrap();
	if admin {
		state
			.group_repo
			.add_member(&state.default_groups.admin, &user.id)
			.await
			.unwrap();
	}
	TestUser {
		token: format!("token-{email}"),
		user,
	}
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let admin = create_member(state, "admin@test.com", "Admin", true).await;
	let alice = create_member(state, "alice@test.com", "Alice", false).await;
	let bob = create_member(state, "bob@test.com", "Bob", false).await;

	let docs = KnowledgeBase::new("Docs");
	let wiki = KnowledgeBase::new("Wiki");
	state.kb_repo.create_kb(&docs).await.unwrap();
	state.kb_repo.create_kb(&wiki).await.unwrap();

	Fixtures {
		admin,
		alice,
		bob,
		docs,
		wiki,
	}
}

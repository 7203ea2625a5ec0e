// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group management: admin-only mutations, flag-based protection.

use axum::http::{Method, StatusCode};
use ragward_server_api::GroupResponse;
use serde_json::json;

use super::support::{body_json, data, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn requests_without_token_are_rejected() {
	let app = TestApp::new().await;

	let cases = vec![
		AuthzCase {
			name: "list_groups_anonymous",
			method: Method::GET,
			path: "/api/rbac/group/list".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "create_group_anonymous",
			method: Method::POST,
			path: "/api/rbac/group/create".to_string(),
			user: None,
			body: Some(json!({ "name": "Sales" })),
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn unknown_token_is_rejected() {
	let app = TestApp::new().await;
	let mut ghost = app.fixtures.alice.clone();
	ghost.token = "rw_not_a_real_token".to_string();

	let response = app.get("/api/rbac/group/list", Some(&ghost)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	let body = body_json(response).await;
	assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn only_admins_manage_groups() {
	let app = TestApp::new().await;
	let users_group = app.state.default_groups.users;

	let cases = vec![
		AuthzCase {
			name: "member_cannot_create",
			method: Method::POST,
			path: "/api/rbac/group/create".to_string(),
			user: Some(app.fixtures.alice.clone()),
			body: Some(json!({ "name": "Sales" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_cannot_update",
			method: Method::PUT,
			path: format!("/api/rbac/group/{users_group}"),
			user: Some(app.fixtures.alice.clone()),
			body: Some(json!({ "name": "Renamed" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_can_create",
			method: Method::POST,
			path: "/api/rbac/group/create".to_string(),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({ "name": "  Sales  ", "description": "Sales team" })),
			expected_status: StatusCode::CREATED,
		},
	];

	run_authz_cases(&app, &cases).await;

	let sales = app.state.group_repo.get_group_by_name("Sales").await.unwrap();
	assert!(sales.is_some(), "name should be stored trimmed");
}

#[tokio::test]
async fn create_validates_name() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let response = app
		.post("/api/rbac/group/create", Some(admin), json!({ "name": "   " }))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let response = app
		.post("/api/rbac/group/create", Some(admin), json!({ "name": "Users" }))
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(body_json(response).await["error"], "conflict");
}

#[tokio::test]
async fn created_group_is_returned_in_envelope() {
	let app = TestApp::new().await;

	let response = app
		.post(
			"/api/rbac/group/create",
			Some(&app.fixtures.admin),
			json!({ "name": "Research", "is_admin": false }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let body = body_json(response).await;
	assert_eq!(body["message"], "Group created");
	assert_eq!(body["data"]["name"], "Research");
	assert_eq!(body["data"]["is_system"], false);
}

#[tokio::test]
async fn update_renames_but_keeps_flags() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let users_group = app.state.default_groups.users;

	let response = app
		.put(
			&format!("/api/rbac/group/{users_group}"),
			Some(admin),
			json!({ "name": "Everyone", "description": "All staff" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let group: GroupResponse = data(response).await;
	assert_eq!(group.name, "Everyone");
	assert_eq!(group.description.as_deref(), Some("All staff"));
	assert!(group.is_system);
	assert!(!group.is_admin);
}

#[tokio::test]
async fn update_rejects_taken_name_and_missing_group() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let users_group = app.state.default_groups.users;

	let response = app
		.put(
			&format!("/api/rbac/group/{users_group}"),
			Some(admin),
			json!({ "name": "Administrators" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);

	let response = app
		.put(
			&format!("/api/rbac/group/{}", uuid::Uuid::new_v4()),
			Some(admin),
			json!({ "name": "Nobody" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let response = app
		.put("/api/rbac/group/not-a-uuid", Some(admin), json!({}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn default_groups_cannot_be_deleted_even_after_rename() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let users_group = app.state.default_groups.users;
	let admin_group = app.state.default_groups.admin;

	let response = app
		.put(
			&format!("/api/rbac/group/{users_group}"),
			Some(admin),
			json!({ "name": "Renamed" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let cases = vec![
		AuthzCase {
			name: "renamed_users_group_protected",
			method: Method::DELETE,
			path: format!("/api/rbac/group/{users_group}"),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_group_protected",
			method: Method::DELETE,
			path: format!("/api/rbac/group/{admin_group}"),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn ordinary_group_named_like_a_default_is_not_protected() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let users_group = app.state.default_groups.users;

	// Free the name, then claim it with an ordinary group.
	app.put(
		&format!("/api/rbac/group/{users_group}"),
		Some(admin),
		json!({ "name": "Everyone" }),
	)
	.await;
	let response = app
		.post("/api/rbac/group/create", Some(admin), json!({ "name": "Users" }))
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let impostor: GroupResponse = data(response).await;
	assert!(!impostor.is_protected());

	let response = app
		.delete(&format!("/api/rbac/group/{}", impostor.id), Some(admin))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await["data"]["deleted"], true);

	let response = app
		.delete(&format!("/api/rbac/group/{}", impostor.id), Some(admin))
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_created_admin_group_is_protected() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let response = app
		.post(
			"/api/rbac/group/create",
			Some(admin),
			json!({ "name": "Ops Admins", "is_admin": true }),
		)
		.await;
	let group: GroupResponse = data(response).await;
	assert!(group.is_admin && !group.is_system);

	let response = app
		.delete(&format!("/api/rbac/group/{}", group.id), Some(admin))
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_scopes_by_role() {
	let app = TestApp::new().await;

	let all: Vec<GroupResponse> = app
		.get_data("/api/rbac/group/list?all=true", &app.fixtures.admin)
		.await;
	assert_eq!(all.len(), 2);
	// Administrators first.
	assert!(all[0].is_admin);

	let mine: Vec<GroupResponse> = app
		.get_data("/api/rbac/group/list?all=true", &app.fixtures.alice)
		.await;
	assert_eq!(mine.len(), 1);
	assert_eq!(mine[0].name, "Users");

	let admin_own: Vec<GroupResponse> = app
		.get_data("/api/rbac/group/list", &app.fixtures.admin)
		.await;
	assert_eq!(admin_own.len(), 2, "admin belongs to both default groups");
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Enterprise admin routes.
//!
//! Key invariant: the whole `/api/rbac/admin` subtree requires an admin
//! group, and is absent unless enterprise mode is on.

use axum::http::{Method, StatusCode};
use ragward_server_api::{KnowledgeBaseResponse, ListUsersResponse};
use ragward_server_auth::UserGroup;

use super::support::{run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn admin_subtree_requires_admin() {
	let app = TestApp::new().await;
	let bob_id = app.fixtures.bob.user.id;

	let mut cases = Vec::new();
	for (name, method, path) in [
		("list_users", Method::GET, "/api/rbac/admin/users".to_string()),
		("list_kbs", Method::GET, "/api/rbac/admin/kbs".to_string()),
		("delete_user", Method::DELETE, format!("/api/rbac/admin/user/{bob_id}")),
	] {
		cases.push(AuthzCase {
			name,
			method: method.clone(),
			path: path.clone(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		});
		cases.push(AuthzCase {
			name,
			method,
			path,
			user: Some(app.fixtures.alice.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		});
	}
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn admin_routes_absent_without_enterprise() {
	let app = TestApp::without_enterprise().await;

	let cases = vec![AuthzCase {
		name: "users_not_mounted",
		method: Method::GET,
		path: "/api/rbac/admin/users".to_string(),
		user: Some(app.fixtures.admin.clone()),
		body: None,
		expected_status: StatusCode::NOT_FOUND,
	}];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn list_users_paginates_and_reports_groups() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let page: ListUsersResponse = app.get_data("/api/rbac/admin/users", admin).await;
	assert_eq!(page.total, 3);
	assert_eq!(page.page, 1);
	assert_eq!(page.page_size, 20);
	assert_eq!(page.users.len(), 3);

	let admin_row = page
		.users
		.iter()
		.find(|u| u.email == "admin@test.com")
		.unwrap();
	assert!(admin_row.is_admin);
	assert_eq!(admin_row.groups.len(), 2);

	let page: ListUsersResponse = app
		.get_data("/api/rbac/admin/users?page=2&page_size=2", admin)
		.await;
	assert_eq!(page.total, 3);
	assert_eq!(page.users.len(), 1);

	let page: ListUsersResponse = app
		.get_data("/api/rbac/admin/users?page_size=1000", admin)
		.await;
	assert_eq!(page.page_size, 100);

	let page: ListUsersResponse = app
		.get_data("/api/rbac/admin/users?search=ALI", admin)
		.await;
	assert_eq!(page.total, 1);
	assert_eq!(page.users[0].nickname, "Alice");
	assert!(!page.users[0].is_admin);
}

#[tokio::test]
async fn delete_user_rules() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let second_admin = app.create_user("root@test.com", "Root").await;
	let ops = UserGroup::new("Ops Admins", None, true);
	app.state.group_repo.create_group(&ops).await.unwrap();
	app.state
		.group_repo
		.add_member(&ops.id, &second_admin.user.id)
		.await
		.unwrap();

	let cases = vec![
		AuthzCase {
			name: "cannot_delete_self",
			method: Method::DELETE,
			path: format!("/api/rbac/admin/user/{}", admin.user.id),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "cannot_delete_admin",
			method: Method::DELETE,
			path: format!("/api/rbac/admin/user/{}", second_admin.user.id),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "missing_user",
			method: Method::DELETE,
			path: format!("/api/rbac/admin/user/{}", uuid::Uuid::new_v4()),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "delete_member",
			method: Method::DELETE,
			path: format!("/api/rbac/admin/user/{}", app.fixtures.bob.user.id),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "deleted_user_token_revoked",
			method: Method::GET,
			path: "/api/rbac/permission/my".to_string(),
			user: Some(app.fixtures.bob.clone()),
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn list_kbs_returns_live_kbs_by_name() {
	let app = TestApp::new().await;
	let archive = app.create_kb("Archive").await;
	app.state.kb_repo.soft_delete_kb(&app.fixtures.wiki.id).await.unwrap();

	let kbs: Vec<KnowledgeBaseResponse> = app
		.get_data("/api/rbac/admin/kbs", &app.fixtures.admin)
		.await;
	let names: Vec<&str> = kbs.iter().map(|kb| kb.name.as_str()).collect();
	assert_eq!(names, vec!["Archive", "Docs"]);
	assert_eq!(kbs[0].id, archive.id.into_inner());
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership routes: listing is open to members, changes to admins.

use axum::http::{Method, StatusCode};
use ragward_server_api::{GroupMemberResponse, MembershipResponse};
use ragward_server_auth::UserGroup;
use serde_json::json;

use super::support::{data, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn members_listing_requires_admin_or_membership() {
	let app = TestApp::new().await;
	let sales = UserGroup::new("Sales", None, false);
	app.state.group_repo.create_group(&sales).await.unwrap();
	app.state
		.group_repo
		.add_member(&sales.id, &app.fixtures.bob.user.id)
		.await
		.unwrap();

	let cases = vec![
		AuthzCase {
			name: "member_can_list",
			method: Method::GET,
			path: format!("/api/rbac/group/{}/members", sales.id),
			user: Some(app.fixtures.bob.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_can_list",
			method: Method::GET,
			path: format!("/api/rbac/group/{}/members", sales.id),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_list",
			method: Method::GET,
			path: format!("/api/rbac/group/{}/members", sales.id),
			user: Some(app.fixtures.alice.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "missing_group",
			method: Method::GET,
			path: format!("/api/rbac/group/{}/members", uuid::Uuid::new_v4()),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn add_member_is_idempotent() {
	let app = TestApp::new().await;
	let sales = UserGroup::new("Sales", None, false);
	app.state.group_repo.create_group(&sales).await.unwrap();
	let path = format!("/api/rbac/group/{}/member", sales.id);
	let body = json!({ "user_id": app.fixtures.alice.user.id });

	let first: MembershipResponse = data(app.post(&path, Some(&app.fixtures.admin), body.clone()).await).await;
	assert!(first.created);

	let second: MembershipResponse = data(app.post(&path, Some(&app.fixtures.admin), body).await).await;
	assert!(!second.created);
	assert_eq!(first.membership_id, second.membership_id);

	let members: Vec<GroupMemberResponse> = app
		.get_data(&format!("/api/rbac/group/{}/members", sales.id), &app.fixtures.admin)
		.await;
	assert_eq!(members.len(), 1);
	assert_eq!(members[0].email, "alice@test.com");
}

#[tokio::test]
async fn add_member_checks_group_user_and_role() {
	let app = TestApp::new().await;
	let users_group = app.state.default_groups.users;

	let cases = vec![
		AuthzCase {
			name: "unknown_user",
			method: Method::POST,
			path: format!("/api/rbac/group/{users_group}/member"),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({ "user_id": uuid::Uuid::new_v4() })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "unknown_group",
			method: Method::POST,
			path: format!("/api/rbac/group/{}/member", uuid::Uuid::new_v4()),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({ "user_id": app.fixtures.alice.user.id })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "member_cannot_add",
			method: Method::POST,
			path: format!("/api/rbac/group/{}/member", app.state.default_groups.admin),
			user: Some(app.fixtures.alice.clone()),
			body: Some(json!({ "user_id": app.fixtures.alice.user.id })),
			expected_status: StatusCode::FORBIDDEN,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn remove_member_then_missing() {
	let app = TestApp::new().await;
	let users_group = app.state.default_groups.users;
	let path = format!(
		"/api/rbac/group/{users_group}/member/{}",
		app.fixtures.bob.user.id
	);

	let response = app.delete(&path, Some(&app.fixtures.admin)).await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app.delete(&path, Some(&app.fixtures.admin)).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let members: Vec<GroupMemberResponse> = app
		.get_data(&format!("/api/rbac/group/{users_group}/members"), &app.fixtures.admin)
		.await;
	assert!(members.iter().all(|m| m.id != app.fixtures.bob.user.id.into_inner()));
}

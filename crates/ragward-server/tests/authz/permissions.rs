// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Knowledge base grants and resolved permissions.

use axum::http::{Method, StatusCode};
use ragward_server_api::{
	AccessibleKbsResponse, GroupResponse, KbAccessResponse, KbPermissionResponse,
	MyPermissionsResponse,
};
use ragward_server_auth::KbAccess;
use serde_json::json;

use super::support::{data, run_authz_cases, AuthzCase, TestApp};

fn read_only() -> KbAccess {
	KbAccess {
		can_read: true,
		..KbAccess::deny()
	}
}

fn update_only() -> KbAccess {
	KbAccess {
		can_update: true,
		..KbAccess::deny()
	}
}

#[tokio::test]
async fn grant_management_is_admin_only() {
	let app = TestApp::new().await;
	let users_group = app.state.default_groups.users;
	let docs = app.fixtures.docs.id;

	let cases = vec![
		AuthzCase {
			name: "member_cannot_set",
			method: Method::POST,
			path: "/api/rbac/permission/kb".to_string(),
			user: Some(app.fixtures.alice.clone()),
			body: Some(json!({ "group_id": users_group, "kb_id": docs, "can_read": true })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_cannot_list_kb_grants",
			method: Method::GET,
			path: format!("/api/rbac/permission/kb/{docs}/list"),
			user: Some(app.fixtures.alice.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_cannot_list_group_grants",
			method: Method::GET,
			path: format!("/api/rbac/group/{users_group}/permissions"),
			user: Some(app.fixtures.alice.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "list_unknown_group_grants",
			method: Method::GET,
			path: format!("/api/rbac/group/{}/permissions", uuid::Uuid::new_v4()),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "set_unknown_kb",
			method: Method::POST,
			path: "/api/rbac/permission/kb".to_string(),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({ "group_id": users_group, "kb_id": uuid::Uuid::new_v4() })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "set_unknown_group",
			method: Method::POST,
			path: "/api/rbac/permission/kb".to_string(),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({ "group_id": uuid::Uuid::new_v4(), "kb_id": docs })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "update_unknown_permission",
			method: Method::PUT,
			path: format!("/api/rbac/permission/kb/{}", uuid::Uuid::new_v4()),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({ "can_read": true })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "delete_unknown_permission",
			method: Method::DELETE,
			path: format!("/api/rbac/permission/kb/{}", uuid::Uuid::new_v4()),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn set_upserts_and_update_keeps_omitted_flags() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let users_group = app.state.default_groups.users;
	let docs = app.fixtures.docs.id;

	let first: KbPermissionResponse = data(
		app.post(
			"/api/rbac/permission/kb",
			Some(admin),
			json!({ "group_id": users_group, "kb_id": docs, "can_read": true }),
		)
		.await,
	)
	.await;
	assert!(first.can_read && !first.can_update && !first.can_delete && !first.can_create);
	assert_eq!(first.group_name.as_deref(), Some("Users"));

	let second: KbPermissionResponse = data(
		app.post(
			"/api/rbac/permission/kb",
			Some(admin),
			json!({ "group_id": users_group, "kb_id": docs, "can_read": true, "can_create": true }),
		)
		.await,
	)
	.await;
	assert_eq!(second.id, first.id, "same pair updates in place");
	assert!(second.can_create);

	let updated: KbPermissionResponse = data(
		app.put(
			&format!("/api/rbac/permission/kb/{}", first.id),
			Some(admin),
			json!({ "can_delete": true }),
		)
		.await,
	)
	.await;
	assert!(updated.can_read && updated.can_create && updated.can_delete);
	assert!(!updated.can_update);
	assert_eq!(updated.group_name.as_deref(), Some("Users"));

	let listed: Vec<KbPermissionResponse> = app
		.get_data(&format!("/api/rbac/permission/kb/{docs}/list"), admin)
		.await;
	assert_eq!(listed.len(), 1);
	assert_eq!(listed[0].id, first.id);

	let response = app
		.delete(&format!("/api/rbac/permission/kb/{}", first.id), Some(admin))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let listed: Vec<KbPermissionResponse> = app
		.get_data(&format!("/api/rbac/permission/kb/{docs}/list"), admin)
		.await;
	assert!(listed.is_empty());
}

#[tokio::test]
async fn my_permissions_merge_grants_across_groups() {
	let app = TestApp::new().await;
	let alice = &app.fixtures.alice;
	let docs = app.fixtures.docs.id;

	app.grant_via_new_group("Readers", alice, docs, read_only()).await;
	app.grant_via_new_group("Editors", alice, docs, update_only()).await;

	let mine: MyPermissionsResponse = app.get_data("/api/rbac/permission/my", alice).await;
	assert!(!mine.is_admin);
	assert_eq!(mine.user_id, alice.user.id.into_inner());
	assert_eq!(mine.groups.len(), 3);
	assert_eq!(mine.kb_permissions.len(), 1);

	let row = mine.kb(docs.into_inner()).unwrap();
	assert_eq!(row.kb_name, "Docs");
	assert!(row.can_read && row.can_update);
	assert!(!row.can_delete && !row.can_create);

	let access: KbAccessResponse = app
		.get_data(&format!("/api/rbac/permission/kb/{docs}/mine"), alice)
		.await;
	assert!(access.can_read && access.can_update && !access.is_admin);
}

#[tokio::test]
async fn user_without_grants_sees_nothing() {
	let app = TestApp::new().await;
	let bob = &app.fixtures.bob;

	let mine: MyPermissionsResponse = app.get_data("/api/rbac/permission/my", bob).await;
	assert!(mine.kb_permissions.is_empty());

	let access: KbAccessResponse = app
		.get_data(&format!("/api/rbac/permission/kb/{}/mine", app.fixtures.wiki.id), bob)
		.await;
	assert!(!access.can_read && !access.can_update && !access.can_delete && !access.can_create);

	let accessible: AccessibleKbsResponse = app.get_data("/api/rbac/kb/accessible", bob).await;
	assert_eq!(accessible.permission, "read");
	assert!(accessible.kb_ids.is_empty());
}

#[tokio::test]
async fn admin_holds_everything() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let mine: MyPermissionsResponse = app.get_data("/api/rbac/permission/my", admin).await;
	assert!(mine.is_admin);
	assert_eq!(mine.kb_permissions.len(), 2);
	assert!(mine
		.kb_permissions
		.iter()
		.all(|p| p.can_read && p.can_update && p.can_delete && p.can_create));
	// Ordered by name.
	assert_eq!(mine.kb_permissions[0].kb_name, "Docs");
	assert_eq!(mine.kb_permissions[1].kb_name, "Wiki");

	let accessible: AccessibleKbsResponse = app
		.get_data("/api/rbac/kb/accessible?permission=delete", admin)
		.await;
	assert_eq!(accessible.kb_ids.len(), 2);
}

#[tokio::test]
async fn accessible_filters_by_kind() {
	let app = TestApp::new().await;
	let alice = &app.fixtures.alice;
	app.grant_via_new_group("Readers", alice, app.fixtures.docs.id, read_only())
		.await;
	app.grant_via_new_group("Wiki editors", alice, app.fixtures.wiki.id, update_only())
		.await;

	let readable: AccessibleKbsResponse = app
		.get_data("/api/rbac/kb/accessible?permission=read", alice)
		.await;
	assert_eq!(readable.kb_ids, vec![app.fixtures.docs.id.into_inner()]);

	let editable: AccessibleKbsResponse = app
		.get_data("/api/rbac/kb/accessible?permission=update", alice)
		.await;
	assert_eq!(editable.kb_ids, vec![app.fixtures.wiki.id.into_inner()]);

	let response = app
		.get("/api/rbac/kb/accessible?permission=admin", Some(alice))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_group_grants_stop_applying() {
	let app = TestApp::new().await;
	let alice = &app.fixtures.alice;
	let docs = app.fixtures.docs.id;
	app.grant_via_new_group("Temp", alice, docs, read_only()).await;

	let temp = app
		.state
		.group_repo
		.get_group_by_name("Temp")
		.await
		.unwrap()
		.unwrap();
	let response = app
		.delete(&format!("/api/rbac/group/{}", temp.id), Some(&app.fixtures.admin))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let access: KbAccessResponse = app
		.get_data(&format!("/api/rbac/permission/kb/{docs}/mine"), alice)
		.await;
	assert!(!access.can_read);
}

#[tokio::test]
async fn update_reports_the_current_group_name() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let docs = app.fixtures.docs.id;

	let group: GroupResponse = data(
		app.post("/api/rbac/group/create", Some(admin), json!({ "name": "Support" }))
			.await,
	)
	.await;
	let grant: KbPermissionResponse = data(
		app.post(
			"/api/rbac/permission/kb",
			Some(admin),
			json!({ "group_id": group.id, "kb_id": docs, "can_read": true }),
		)
		.await,
	)
	.await;

	let renamed = app
		.put(
			&format!("/api/rbac/group/{}", group.id),
			Some(admin),
			json!({ "name": "Customer support" }),
		)
		.await;
	assert_eq!(renamed.status(), StatusCode::OK);

	let updated: KbPermissionResponse = data(
		app.put(
			&format!("/api/rbac/permission/kb/{}", grant.id),
			Some(admin),
			json!({ "can_update": true }),
		)
		.await,
	)
	.await;
	assert_eq!(updated.group_name.as_deref(), Some("Customer support"));
	assert!(updated.can_read && updated.can_update);
}

#[tokio::test]
async fn group_grants_name_each_knowledge_base() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let docs = app.fixtures.docs.id;
	let wiki = app.fixtures.wiki.id;

	let group: GroupResponse = data(
		app.post("/api/rbac/group/create", Some(admin), json!({ "name": "Writers" }))
			.await,
	)
	.await;
	for (kb_id, flags) in [
		(docs, json!({ "can_read": true })),
		(wiki, json!({ "can_read": true, "can_create": true })),
	] {
		let mut body = flags;
		body["group_id"] = json!(group.id);
		body["kb_id"] = json!(kb_id);
		let response = app.post("/api/rbac/permission/kb", Some(admin), body).await;
		assert_eq!(response.status(), StatusCode::OK);
	}

	let grants: Vec<KbPermissionResponse> = app
		.get_data(&format!("/api/rbac/group/{}/permissions", group.id), admin)
		.await;
	assert_eq!(grants.len(), 2);
	assert!(grants.iter().all(|g| g.group_id == group.id));
	assert!(grants.iter().all(|g| g.group_name.as_deref() == Some("Writers")));

	let wiki_grant = grants
		.iter()
		.find(|g| g.kb_id == wiki.into_inner())
		.expect("wiki grant listed");
	assert_eq!(wiki_grant.kb_name.as_deref(), Some("Wiki"));
	assert!(wiki_grant.can_create);

	let empty: Vec<KbPermissionResponse> = app
		.get_data(
			&format!("/api/rbac/group/{}/permissions", app.state.default_groups.admin),
			admin,
		)
		.await;
	assert!(empty.is_empty(), "admin access is implicit, not stored as grants");
}

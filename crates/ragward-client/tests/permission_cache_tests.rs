// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ragward_client::{CacheState, PermissionCache, RbacClient};
use ragward_server_auth::KbAccess;

fn client_for(server: &MockServer) -> RbacClient {
	RbacClient::builder()
		.base_url(server.uri())
		.auth_token("rw_cache_token")
		.build()
		.unwrap()
}

async fn mount_permissions(server: &MockServer, is_admin: bool, readable: Uuid, writable: Uuid, expected_calls: u64) {
	Mock::given(method("GET"))
		.and(path("/api/rbac/permission/my"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"data": {
				"user_id": Uuid::new_v4(),
				"is_admin": is_admin,
				"groups": [],
				"kb_permissions": [
					{ "kb_id": readable, "kb_name": "Docs", "can_read": true, "can_update": false, "can_delete": false, "can_create": false },
					{ "kb_id": writable, "kb_name": "Wiki", "can_read": true, "can_update": true, "can_delete": false, "can_create": true },
				],
			}
		})))
		.expect(expected_calls)
		.mount(server)
		.await;
}

#[tokio::test]
async fn denies_everything_before_first_load() {
	let server = MockServer::start().await;
	let cache = PermissionCache::new(client_for(&server));

	assert_eq!(cache.state(), CacheState::Idle);
	assert_eq!(cache.kb_access(Uuid::new_v4()), KbAccess::deny());
	assert!(!cache.is_admin());
	assert!(!cache.is_fresh());
}

#[tokio::test]
async fn answers_from_snapshot_once_loaded() {
	let server = MockServer::start().await;
	let docs = Uuid::new_v4();
	let wiki = Uuid::new_v4();
	mount_permissions(&server, false, docs, wiki, 1).await;

	let cache = PermissionCache::new(client_for(&server));
	cache.load().await.unwrap();

	assert_eq!(cache.state(), CacheState::Ready);
	assert!(cache.kb_access(docs).can_read);
	assert!(!cache.kb_access(docs).can_update);
	let wiki_access = cache.kb_access(wiki);
	assert!(wiki_access.can_update && wiki_access.can_create && !wiki_access.can_delete);

	// Unknown KB: default deny.
	assert_eq!(cache.kb_access(Uuid::new_v4()), KbAccess::deny());
}

#[tokio::test]
async fn can_access_all_kbs_requires_every_id_and_a_nonempty_list() {
	let server = MockServer::start().await;
	let docs = Uuid::new_v4();
	let wiki = Uuid::new_v4();
	mount_permissions(&server, false, docs, wiki, 1).await;

	let cache = PermissionCache::new(client_for(&server));
	cache.load().await.unwrap();

	assert!(cache.can_access_all_kbs(&[docs, wiki]));
	assert!(!cache.can_access_all_kbs(&[docs, Uuid::new_v4()]));
	assert!(!cache.can_access_all_kbs(&[]));
}

#[tokio::test]
async fn fresh_snapshot_is_reused() {
	let server = MockServer::start().await;
	mount_permissions(&server, true, Uuid::new_v4(), Uuid::new_v4(), 1).await;

	let cache = PermissionCache::new(client_for(&server));
	cache.load().await.unwrap();
	cache.load().await.unwrap();
	cache.load().await.unwrap();

	assert!(cache.is_admin());
	assert!(cache.is_fresh());
}

#[tokio::test]
async fn stale_snapshot_is_refetched() {
	let server = MockServer::start().await;
	mount_permissions(&server, false, Uuid::new_v4(), Uuid::new_v4(), 2).await;

	let cache = PermissionCache::with_stale_after(client_for(&server), Duration::ZERO);
	cache.load().await.unwrap();
	assert!(!cache.is_fresh());
	cache.load().await.unwrap();
}

#[tokio::test]
async fn invalidate_forces_refetch_but_keeps_answering() {
	let server = MockServer::start().await;
	let docs = Uuid::new_v4();
	mount_permissions(&server, false, docs, Uuid::new_v4(), 2).await;

	let cache = PermissionCache::new(client_for(&server));
	cache.load().await.unwrap();
	cache.invalidate();

	assert!(!cache.is_fresh());
	assert!(cache.kb_access(docs).can_read);

	cache.load().await.unwrap();
	assert!(cache.is_fresh());
}

#[tokio::test]
async fn failed_load_denies() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/api/rbac/permission/my"))
		.respond_with(ResponseTemplate::new(500).set_body_json(json!({
			"error": "internal_error",
			"message": "A database error occurred",
		})))
		.mount(&server)
		.await;

	let cache = PermissionCache::new(client_for(&server));
	assert!(cache.load().await.is_err());

	assert!(matches!(cache.state(), CacheState::Failed(ref msg) if msg.contains("A database error occurred")));
	assert_eq!(cache.kb_access(Uuid::new_v4()), KbAccess::deny());
	assert!(!cache.is_admin());
}

#[tokio::test]
async fn failed_refresh_hides_previous_snapshot() {
	let server = MockServer::start().await;
	let docs = Uuid::new_v4();

	Mock::given(method("GET"))
		.and(path("/api/rbac/permission/my"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"data": {
				"user_id": Uuid::new_v4(),
				"is_admin": false,
				"groups": [],
				"kb_permissions": [
					{ "kb_id": docs, "kb_name": "Docs", "can_read": true, "can_update": false, "can_delete": false, "can_create": false },
				],
			}
		})))
		.up_to_n_times(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/api/rbac/permission/my"))
		.respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
		.mount(&server)
		.await;

	let cache = PermissionCache::new(client_for(&server));
	cache.load().await.unwrap();
	assert!(cache.kb_access(docs).can_read);

	assert!(cache.refresh().await.is_err());
	assert_eq!(cache.kb_access(docs), KbAccess::deny());
}

#[tokio::test]
async fn loading_denies_even_with_previous_snapshot() {
	let server = MockServer::start().await;
	let docs = Uuid::new_v4();
	let body = json!({
		"data": {
			"user_id": Uuid::new_v4(),
			"is_admin": true,
			"groups": [],
			"kb_permissions": [
				{ "kb_id": docs, "kb_name": "Docs", "can_read": true, "can_update": true, "can_delete": true, "can_create": true },
			],
		}
	});

	Mock::given(method("GET"))
		.and(path("/api/rbac/permission/my"))
		.respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
		.up_to_n_times(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/api/rbac/permission/my"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(body)
				.set_delay(Duration::from_millis(500)),
		)
		.mount(&server)
		.await;

	let cache = PermissionCache::new(client_for(&server));
	cache.load().await.unwrap();
	assert!(cache.kb_access(docs).can_delete);

	let background = cache.clone();
	let refresh = tokio::spawn(async move { background.refresh().await });
	tokio::time::sleep(Duration::from_millis(100)).await;

	assert_eq!(cache.state(), CacheState::Loading);
	assert_eq!(cache.kb_access(docs), KbAccess::deny());
	assert!(!cache.is_admin());

	refresh.await.unwrap().unwrap();
	assert_eq!(cache.state(), CacheState::Ready);
	assert!(cache.kb_access(docs).can_delete);
}

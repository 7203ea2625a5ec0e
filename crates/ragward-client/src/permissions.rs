// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-side cache of the caller's resolved permissions.
//!
//! The cache holds one `GET /permission/my` snapshot. Lookups are
//! synchronous and default-deny: while nothing has loaded, while a load is
//! in flight, after a failed load, or for a knowledge base missing from the
//! snapshot, [`PermissionCache::kb_access`] returns [`KbAccess::deny`].
//!
//! A snapshot is reused until it is older than the stale window (five
//! minutes by default) or [`PermissionCache::invalidate`] is called.
//! Mutations made through [`RbacClient`] do not invalidate the cache.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use uuid::Uuid;

use ragward_server_api::MyPermissionsResponse;
use ragward_server_auth::KbAccess;

use crate::client::RbacClient;
use crate::error::Result;

/// How long a snapshot is served before the next load refetches it.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Observable state of the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
	/// Nothing requested yet.
	Idle,
	/// A fetch is in flight.
	Loading,
	/// A snapshot is available.
	Ready,
	/// The last fetch failed; the message is the error's display text.
	Failed(String),
}

struct Snapshot {
	permissions: MyPermissionsResponse,
	fetched_at: Instant,
}

struct CacheInner {
	state: CacheState,
	snapshot: Option<Snapshot>,
	invalidated: bool,
}

/// Caches `my_permissions` for one client.
#[derive(Clone)]
pub struct PermissionCache {
	client: RbacClient,
	stale_after: Duration,
	inner: Arc<Mutex<CacheInner>>,
}

impl std::fmt::Debug for PermissionCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PermissionCache")
			.field("stale_after", &self.stale_after)
			.field("state", &self.state())
			.finish_non_exhaustive()
	}
}

impl PermissionCache {
	pub fn new(client: RbacClient) -> Self {
		Self::with_stale_after(client, DEFAULT_STALE_AFTER)
	}

	pub fn with_stale_after(client: RbacClient, stale_after: Duration) -> Self {
		Self {
			client,
			stale_after,
			inner: Arc::new(Mutex::new(CacheInner {
				state: CacheState::Idle,
				snapshot: None,
				invalidated: false,
			})),
		}
	}

	fn lock(&self) -> MutexGuard<'_, CacheInner> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn state(&self) -> CacheState {
		self.lock().state.clone()
	}

	/// Returns true if a fresh snapshot is held.
	pub fn is_fresh(&self) -> bool {
		let inner = self.lock();
		inner.state == CacheState::Ready
			&& !inner.invalidated
			&& inner
				.snapshot
				.as_ref()
				.is_some_and(|s| s.fetched_at.elapsed() < self.stale_after)
	}

	/// Loads the snapshot unless a fresh one is already held.
	pub async fn load(&self) -> Result<MyPermissionsResponse> {
		if self.is_fresh() {
			if let Some(snapshot) = self.lock().snapshot.as_ref() {
				debug!("Serving cached permissions");
				return Ok(snapshot.permissions.clone());
			}
		}
		self.refresh().await
	}

	/// Fetches a new snapshot regardless of freshness.
	pub async fn refresh(&self) -> Result<MyPermissionsResponse> {
		{
			let mut inner = self.lock();
			inner.state = CacheState::Loading;
		}

		match self.client.my_permissions().await {
			Ok(permissions) => {
				let mut inner = self.lock();
				inner.snapshot = Some(Snapshot {
					permissions: permissions.clone(),
					fetched_at: Instant::now(),
				});
				inner.invalidated = false;
				inner.state = CacheState::Ready;
				debug!(
					kb_count = permissions.kb_permissions.len(),
					is_admin = permissions.is_admin,
					"Permissions loaded"
				);
				Ok(permissions)
			}
			Err(e) => {
				warn!(error = %e, "Failed to load permissions");
				let mut inner = self.lock();
				inner.state = CacheState::Failed(e.to_string());
				Err(e)
			}
		}
	}

	/// Marks the snapshot stale so the next [`load`](Self::load) refetches.
	///
	/// Lookups keep answering from the old snapshot until then.
	pub fn invalidate(&self) {
		self.lock().invalidated = true;
	}

	/// The caller's capabilities on `kb_id`. Denies when unknown.
	pub fn kb_access(&self, kb_id: Uuid) -> KbAccess {
		let inner = self.lock();
		if inner.state != CacheState::Ready {
			return KbAccess::deny();
		}
		inner
			.snapshot
			.as_ref()
			.and_then(|s| s.permissions.kb(kb_id))
			.map(|p| KbAccess {
				can_read: p.can_read,
				can_update: p.can_update,
				can_delete: p.can_delete,
				can_create: p.can_create,
			})
			.unwrap_or_else(KbAccess::deny)
	}

	/// True when every id is readable. An empty list is never satisfied.
	pub fn can_access_all_kbs(&self, kb_ids: &[Uuid]) -> bool {
		!kb_ids.is_empty() && kb_ids.iter().all(|id| self.kb_access(*id).can_read)
	}

	/// True only when a snapshot is loaded and says the caller is an admin.
	pub fn is_admin(&self) -> bool {
		let inner = self.lock();
		inner.state == CacheState::Ready
			&& inner
				.snapshot
				.as_ref()
				.is_some_and(|s| s.permissions.is_admin)
	}
}

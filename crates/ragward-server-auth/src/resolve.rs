// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission resolution engine.
//!
//! Resolution is a two-phase evaluation over data already loaded by the
//! caller:
//!
//! 1. **Admin override**: membership in any admin group grants every
//!    capability on every knowledge base
//! 2. **Grant merge**: otherwise each capability is the OR of that capability
//!    across the grants held by the user's groups
//!
//! All functions are pure, so the HTTP layer only has to load a
//! [`PermissionSubject`] once per request.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::group::UserGroup;
use crate::permission::{KbAccess, KbPermission, KnowledgeBase};
use crate::types::{GroupId, KbId, PermissionKind, UserId};

/// Name rendered for a granted knowledge base that no longer resolves.
pub const UNKNOWN_KB_NAME: &str = "Unknown";

/// Everything needed to answer authorization questions for one user.
#[derive(Debug, Clone)]
pub struct PermissionSubject {
	pub user_id: UserId,
	/// Live groups the user belongs to.
	pub groups: Vec<UserGroup>,
	/// Grants held by those groups.
	pub grants: Vec<KbPermission>,
}

impl PermissionSubject {
	pub fn new(user_id: UserId, groups: Vec<UserGroup>, grants: Vec<KbPermission>) -> Self {
		Self {
			user_id,
			groups,
			grants,
		}
	}

	/// A user with no groups and no grants.
	pub fn empty(user_id: UserId) -> Self {
		Self::new(user_id, Vec::new(), Vec::new())
	}

	/// Returns true if any of the user's live groups is an admin group.
	pub fn is_admin(&self) -> bool {
		self.groups.iter().any(|g| g.is_live() && g.is_admin)
	}

	/// Returns true if the user belongs to the given group.
	pub fn is_member_of(&self, group_id: GroupId) -> bool {
		self.groups.iter().any(|g| g.id == group_id && g.is_live())
	}

	/// Grants whose group is one of the user's live groups.
	fn effective_grants(&self) -> impl Iterator<Item = &KbPermission> {
		let live: HashSet<GroupId> = self
			.groups
			.iter()
			.filter(|g| g.is_live())
			.map(|g| g.id)
			.collect();
		self
			.grants
			.iter()
			.filter(move |grant| live.contains(&grant.group_id))
	}
}

/// A resolved, OR-merged permission row for one knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedKbPermission {
	pub kb_id: KbId,
	pub kb_name: String,
	#[serde(flatten)]
	pub access: KbAccess,
}

/// Resolves the user's capabilities on a single knowledge base.
#[instrument(level = "debug", skip_all, fields(user_id = %subject.user_id, kb_id = %kb_id))]
pub fn kb_access(subject: &PermissionSubject, kb_id: KbId) -> KbAccess {
	if subject.is_admin() {
		return KbAccess::full();
	}

	subject
		.effective_grants()
		.filter(|grant| grant.kb_id == kb_id)
		.fold(KbAccess::deny(), |acc, grant| acc.merge(grant.access))
}

/// Returns true if the user holds `kind` on the knowledge base.
pub fn is_allowed(subject: &PermissionSubject, kind: PermissionKind, kb_id: KbId) -> bool {
	let allowed = kb_access(subject, kb_id).allows(kind);
	tracing::debug!(user_id = %subject.user_id, %kb_id, %kind, allowed, "kb permission evaluated");
	allowed
}

/// Resolves one row per knowledge base the user can see.
///
/// Admins get an all-true row for every knowledge base in `kbs`. Everyone
/// else gets one merged row per granted knowledge base, ordered by name.
#[instrument(level = "debug", skip(subject, kbs), fields(user_id = %subject.user_id))]
pub fn resolve_all(subject: &PermissionSubject, kbs: &[KnowledgeBase]) -> Vec<ResolvedKbPermission> {
	if subject.is_admin() {
		let mut rows: Vec<_> = kbs
			.iter()
			.filter(|kb| kb.deleted_at.is_none())
			.map(|kb| ResolvedKbPermission {
				kb_id: kb.id,
				kb_name: kb.name.clone(),
				access: KbAccess::full(),
			})
			.collect();
		sort_rows(&mut rows);
		return rows;
	}

	let names: HashMap<KbId, &str> = kbs.iter().map(|kb| (kb.id, kb.name.as_str())).collect();
	let mut merged: BTreeMap<KbId, KbAccess> = BTreeMap::new();
	for grant in subject.effective_grants() {
		let entry = merged.entry(grant.kb_id).or_insert_with(KbAccess::deny);
		*entry = entry.merge(grant.access);
	}

	let mut rows: Vec<_> = merged
		.into_iter()
		.map(|(kb_id, access)| ResolvedKbPermission {
			kb_id,
			kb_name: names
				.get(&kb_id)
				.map(|name| name.to_string())
				.unwrap_or_else(|| UNKNOWN_KB_NAME.to_string()),
			access,
		})
		.collect();
	sort_rows(&mut rows);
	rows
}

fn sort_rows(rows: &mut [ResolvedKbPermission]) {
	rows.sort_by(|a, b| a.kb_name.cmp(&b.kb_name).then(a.kb_id.cmp(&b.kb_id)));
}

/// Lists the knowledge bases on which the user holds `kind`.
///
/// Admins get every live knowledge base in `all_kbs`.
#[instrument(level = "debug", skip_all, fields(user_id = %subject.user_id, kind = %kind))]
pub fn accessible_kb_ids(
	subject: &PermissionSubject,
	kind: PermissionKind,
	all_kbs: &[KnowledgeBase],
) -> Vec<KbId> {
	if subject.is_admin() {
		return all_kbs
			.iter()
			.filter(|kb| kb.deleted_at.is_none())
			.map(|kb| kb.id)
			.collect();
	}

	let ids: BTreeSet<KbId> = subject
		.effective_grants()
		.filter(|grant| grant.access.allows(kind))
		.map(|grant| grant.kb_id)
		.collect();
	ids.into_iter().collect()
}

/// Returns true if the user can read every listed knowledge base.
///
/// An empty list is allowed: operations spanning no knowledge bases need no
/// grant.
pub fn can_access_all(subject: &PermissionSubject, kb_ids: &[KbId]) -> bool {
	if kb_ids.is_empty() || subject.is_admin() {
		return true;
	}

	let readable: HashSet<KbId> = subject
		.effective_grants()
		.filter(|grant| grant.access.can_read)
		.map(|grant| grant.kb_id)
		.collect();
	kb_ids.iter().all(|id| readable.contains(id))
}

/// Keeps the items whose knowledge base the user holds `kind` on.
pub fn filter_kbs<T>(
	subject: &PermissionSubject,
	kind: PermissionKind,
	items: Vec<T>,
	kb_id_of: impl Fn(&T) -> KbId,
) -> Vec<T> {
	if subject.is_admin() {
		return items;
	}

	let allowed: HashSet<KbId> = subject
		.effective_grants()
		.filter(|grant| grant.access.allows(kind))
		.map(|grant| grant.kb_id)
		.collect();
	items
		.into_iter()
		.filter(|item| allowed.contains(&kb_id_of(item)))
		.collect()
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Domain record to wire type conversions.

use ragward_server_api::{
	AdminUserResponse, GroupMemberResponse, GroupResponse, KbAccessResponse, KbPermissionResponse,
	KnowledgeBaseResponse, MyGroupResponse, MyKbPermissionResponse,
};
use ragward_server_auth::{
	KbAccess, KbId, KbPermission, KnowledgeBase, ResolvedKbPermission, User, UserGroup,
};

pub fn group_response(group: &UserGroup) -> GroupResponse {
	GroupResponse {
		id: group.id.into_inner(),
		name: group.name.clone(),
		description: group.description.clone(),
		is_admin: group.is_admin,
		is_system: group.is_system,
		created_at: group.created_at,
		updated_at: group.updated_at,
	}
}

pub fn my_group_response(group: &UserGroup) -> MyGroupResponse {
	MyGroupResponse {
		id: group.id.into_inner(),
		name: group.name.clone(),
		is_admin: group.is_admin,
	}
}

pub fn member_response(user: &User) -> GroupMemberResponse {
	GroupMemberResponse {
		id: user.id.into_inner(),
		email: user.email.clone(),
		nickname: user.nickname.clone(),
		avatar_url: user.avatar_url.clone(),
	}
}

pub fn permission_response(permission: &KbPermission, group_name: Option<String>) -> KbPermissionResponse {
	KbPermissionResponse {
		id: permission.id.into_inner(),
		group_id: permission.group_id.into_inner(),
		group_name,
		kb_id: permission.kb_id.into_inner(),
		kb_name: None,
		can_read: permission.access.can_read,
		can_update: permission.access.can_update,
		can_delete: permission.access.can_delete,
		can_create: permission.access.can_create,
		created_at: permission.created_at,
		updated_at: permission.updated_at,
	}
}

pub fn resolved_response(row: &ResolvedKbPermission) -> MyKbPermissionResponse {
	MyKbPermissionResponse {
		kb_id: row.kb_id.into_inner(),
		kb_name: row.kb_name.clone(),
		can_read: row.access.can_read,
		can_update: row.access.can_update,
		can_delete: row.access.can_delete,
		can_create: row.access.can_create,
	}
}

pub fn kb_access_response(kb_id: KbId, is_admin: bool, access: KbAccess) -> KbAccessResponse {
	KbAccessResponse {
		kb_id: kb_id.into_inner(),
		is_admin,
		can_read: access.can_read,
		can_update: access.can_update,
		can_delete: access.can_delete,
		can_create: access.can_create,
	}
}

pub fn kb_response(kb: &KnowledgeBase) -> KnowledgeBaseResponse {
	KnowledgeBaseResponse {
		id: kb.id.into_inner(),
		name: kb.name.clone(),
		created_at: kb.created_at,
	}
}

/// Admin view of a user; `is_admin` is derived from the user's live groups.
pub fn admin_user_response(user: &User, groups: &[UserGroup]) -> AdminUserResponse {
	AdminUserResponse {
		id: user.id.into_inner(),
		email: user.email.clone(),
		nickname: user.nickname.clone(),
		avatar_url: user.avatar_url.clone(),
		is_admin: groups.iter().any(|g| g.is_live() && g.is_admin),
		groups: groups.iter().map(my_group_response).collect(),
		created_at: user.created_at,
	}
}

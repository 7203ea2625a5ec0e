// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for ragward-server, served at `/api/openapi.json`.
//!
//! Success bodies are wrapped as `{"message": ..., "data": ...}`; the
//! schemas below describe the `data` payload.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ragward Server API",
        version = "1.0.0",
        description = "Group-based access control for knowledge bases.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "groups", description = "User group management"),
        (name = "members", description = "Group membership"),
        (name = "permissions", description = "Knowledge base grants and resolved permissions"),
        (name = "admin", description = "Enterprise user and knowledge base administration"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::routes::groups::create_group,
        crate::routes::groups::update_group,
        crate::routes::groups::delete_group,
        crate::routes::groups::list_groups,
        crate::routes::members::list_members,
        crate::routes::members::add_member,
        crate::routes::members::remove_member,
        crate::routes::permissions::set_permission,
        crate::routes::permissions::update_permission,
        crate::routes::permissions::delete_permission,
        crate::routes::permissions::list_kb_permissions,
        crate::routes::permissions::list_group_permissions,
        crate::routes::permissions::my_permissions,
        crate::routes::permissions::my_kb_access,
        crate::routes::kbs::accessible_kbs,
        crate::routes::admin::list_users,
        crate::routes::admin::delete_user,
        crate::routes::admin::list_kbs,
        crate::routes::health::health_check,
    ),
    components(schemas(
        ragward_server_api::GroupResponse,
        ragward_server_api::CreateGroupRequest,
        ragward_server_api::UpdateGroupRequest,
        ragward_server_api::GroupMemberResponse,
        ragward_server_api::AddMemberRequest,
        ragward_server_api::MembershipResponse,
        ragward_server_api::KbPermissionResponse,
        ragward_server_api::SetKbPermissionRequest,
        ragward_server_api::UpdateKbPermissionRequest,
        ragward_server_api::MyGroupResponse,
        ragward_server_api::MyKbPermissionResponse,
        ragward_server_api::MyPermissionsResponse,
        ragward_server_api::KbAccessResponse,
        ragward_server_api::AccessibleKbsResponse,
        ragward_server_api::AdminUserResponse,
        ragward_server_api::ListUsersResponse,
        ragward_server_api::KnowledgeBaseResponse,
        ragward_server_api::DeletedResponse,
        ragward_server_api::RbacErrorResponse,
        ragward_server_api::HealthResponse,
        ragward_server_api::HealthStatus,
    ))
)]
pub struct ApiDoc;

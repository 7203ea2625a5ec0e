// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client for the permissions API.
//!
//! Every method maps to exactly one route under `/api/rbac`. Requests are
//! sent once; there is no retry layer. Successful bodies are unwrapped from
//! the `{ data, message }` envelope and error bodies are turned into
//! [`ClientError`] using the server's `message`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use ragward_server_api::{
	AccessibleKbsParams, AccessibleKbsResponse, AddMemberRequest, CreateGroupRequest,
	DeletedResponse, GroupMemberResponse, GroupResponse, KbAccessResponse, KbPermissionResponse,
	KnowledgeBaseResponse, ListGroupsParams, ListUsersParams, ListUsersResponse,
	MembershipResponse, MyPermissionsResponse, RbacErrorResponse, SetKbPermissionRequest,
	UpdateGroupRequest, UpdateKbPermissionRequest,
};
use ragward_server_auth::PermissionKind;

use crate::error::{ClientError, Result};

const SDK_NAME: &str = "ragward-client";
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
const API_PREFIX: &str = "/api/rbac";

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Per-request timeout.
	pub request_timeout: Duration,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			request_timeout: ragward_common_http::DEFAULT_TIMEOUT,
		}
	}
}

/// Builder for [`RbacClient`].
#[derive(Debug, Default)]
pub struct RbacClientBuilder {
	auth_token: Option<String>,
	base_url: Option<String>,
	config: ClientConfig,
}

impl RbacClientBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the bearer token (required).
	pub fn auth_token(mut self, token: impl Into<String>) -> Self {
		self.auth_token = Some(token.into());
		self
	}

	/// Set the server base URL, e.g. `https://rag.example.com` (required).
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	pub fn build(self) -> Result<RbacClient> {
		let auth_token = self
			.auth_token
			.filter(|t| !t.trim().is_empty())
			.ok_or(ClientError::InvalidAuthToken)?;
		let base_url = self
			.base_url
			.map(|u| u.trim_end_matches('/').to_string())
			.filter(|u| u.starts_with("http://") || u.starts_with("https://"))
			.ok_or(ClientError::InvalidBaseUrl)?;

		let http_client = ragward_common_http::builder()
			.timeout(self.config.request_timeout)
			.build()?;

		info!(
			base_url = %base_url,
			sdk_name = SDK_NAME,
			sdk_version = SDK_VERSION,
			"Permissions client initialized"
		);

		Ok(RbacClient {
			inner: Arc::new(Inner {
				auth_token,
				base_url,
				http_client,
			}),
		})
	}
}

/// Client for the permissions API. Cheap to clone.
#[derive(Clone)]
pub struct RbacClient {
	inner: Arc<Inner>,
}

struct Inner {
	auth_token: String,
	base_url: String,
	http_client: reqwest::Client,
}

impl std::fmt::Debug for RbacClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RbacClient")
			.field("base_url", &self.inner.base_url)
			.finish_non_exhaustive()
	}
}

impl RbacClient {
	pub fn builder() -> RbacClientBuilder {
		RbacClientBuilder::new()
	}

	pub fn base_url(&self) -> &str {
		&self.inner.base_url
	}

	// Groups

	#[instrument(skip(self, request), fields(name = %request.name))]
	pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<GroupResponse> {
		self.send(self.request(Method::POST, "/group/create").json(request)).await
	}

	/// Lists the caller's groups, or every group when `all` is set and the
	/// caller is an admin.
	#[instrument(skip(self))]
	pub async fn list_groups(&self, all: bool) -> Result<Vec<GroupResponse>> {
		let params = ListGroupsParams { all };
		self.send(self.request(Method::GET, "/group/list").query(&params)).await
	}

	#[instrument(skip(self, request))]
	pub async fn update_group(&self, group_id: Uuid, request: &UpdateGroupRequest) -> Result<GroupResponse> {
		let path = format!("/group/{group_id}");
		self.send(self.request(Method::PUT, &path).json(request)).await
	}

	#[instrument(skip(self))]
	pub async fn delete_group(&self, group_id: Uuid) -> Result<()> {
		let path = format!("/group/{group_id}");
		let _: DeletedResponse = self.send(self.request(Method::DELETE, &path)).await?;
		Ok(())
	}

	/// Deletes `group` unless it is a default or admin group.
	///
	/// The server refuses these too; checking first avoids the round trip and
	/// gives a clearer error.
	pub async fn delete_group_checked(&self, group: &GroupResponse) -> Result<()> {
		if group.is_protected() {
			return Err(ClientError::ProtectedGroup {
				name: group.name.clone(),
			});
		}
		self.delete_group(group.id).await
	}

	// Members

	#[instrument(skip(self))]
	pub async fn list_members(&self, group_id: Uuid) -> Result<Vec<GroupMemberResponse>> {
		let path = format!("/group/{group_id}/members");
		self.send(self.request(Method::GET, &path)).await
	}

	#[instrument(skip(self))]
	pub async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<MembershipResponse> {
		let path = format!("/group/{group_id}/member");
		let body = AddMemberRequest { user_id };
		self.send(self.request(Method::POST, &path).json(&body)).await
	}

	#[instrument(skip(self))]
	pub async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<()> {
		let path = format!("/group/{group_id}/member/{user_id}");
		let _: DeletedResponse = self.send(self.request(Method::DELETE, &path)).await?;
		Ok(())
	}

	// KB permissions

	/// Creates or replaces the grant for `(group_id, kb_id)`.
	#[instrument(skip(self, request), fields(group_id = %request.group_id, kb_id = %request.kb_id))]
	pub async fn set_kb_permission(&self, request: &SetKbPermissionRequest) -> Result<KbPermissionResponse> {
		self.send(self.request(Method::POST, "/permission/kb").json(request)).await
	}

	#[instrument(skip(self, request))]
	pub async fn update_kb_permission(
		&self,
		permission_id: Uuid,
		request: &UpdateKbPermissionRequest,
	) -> Result<KbPermissionResponse> {
		let path = format!("/permission/kb/{permission_id}");
		self.send(self.request(Method::PUT, &path).json(request)).await
	}

	#[instrument(skip(self))]
	pub async fn delete_kb_permission(&self, permission_id: Uuid) -> Result<()> {
		let path = format!("/permission/kb/{permission_id}");
		let _: DeletedResponse = self.send(self.request(Method::DELETE, &path)).await?;
		Ok(())
	}

	#[instrument(skip(self))]
	pub async fn list_kb_permissions(&self, kb_id: Uuid) -> Result<Vec<KbPermissionResponse>> {
		let path = format!("/permission/kb/{kb_id}/list");
		self.send(self.request(Method::GET, &path)).await
	}

	/// Every grant a group holds, each carrying its knowledge base name.
	#[instrument(skip(self))]
	pub async fn list_group_permissions(&self, group_id: Uuid) -> Result<Vec<KbPermissionResponse>> {
		let path = format!("/group/{group_id}/permissions");
		self.send(self.request(Method::GET, &path)).await
	}

	/// The caller's resolved permissions over every knowledge base.
	#[instrument(skip(self))]
	pub async fn my_permissions(&self) -> Result<MyPermissionsResponse> {
		self.send(self.request(Method::GET, "/permission/my")).await
	}

	#[instrument(skip(self))]
	pub async fn my_kb_access(&self, kb_id: Uuid) -> Result<KbAccessResponse> {
		let path = format!("/permission/kb/{kb_id}/mine");
		self.send(self.request(Method::GET, &path)).await
	}

	/// IDs of knowledge bases where the caller holds `kind` (read when `None`).
	#[instrument(skip(self))]
	pub async fn accessible_kbs(&self, kind: Option<PermissionKind>) -> Result<AccessibleKbsResponse> {
		let params = AccessibleKbsParams {
			permission: kind.map(|k| k.to_string()),
		};
		self.send(self.request(Method::GET, "/kb/accessible").query(&params)).await
	}

	// Admin

	#[instrument(skip(self, params), fields(page = params.page, page_size = params.page_size))]
	pub async fn list_users(&self, params: &ListUsersParams) -> Result<ListUsersResponse> {
		self.send(self.request(Method::GET, "/admin/users").query(params)).await
	}

	#[instrument(skip(self))]
	pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
		let path = format!("/admin/user/{user_id}");
		let _: DeletedResponse = self.send(self.request(Method::DELETE, &path)).await?;
		Ok(())
	}

	#[instrument(skip(self))]
	pub async fn list_kbs(&self) -> Result<Vec<KnowledgeBaseResponse>> {
		self.send(self.request(Method::GET, "/admin/kbs")).await
	}

	// Plumbing

	fn request(&self, method: Method, path: &str) -> RequestBuilder {
		let url = format!("{}{}{}", self.inner.base_url, API_PREFIX, path);
		debug!(method = %method, url = %url, "Sending request");
		self.inner
			.http_client
			.request(method, url)
			.header("Authorization", format!("Bearer {}", self.inner.auth_token))
	}

	async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
		let response = request.send().await?;
		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			let message = error_message(status, &body);
			error!(status = %status, message = %message, "Permissions API returned an error");
			return Err(ClientError::from_status(status.as_u16(), message));
		}

		decode_envelope(&body)
	}
}

/// Pulls `data` out of a success body.
pub(crate) fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
	let mut value: serde_json::Value = serde_json::from_str(body)?;
	match value.get_mut("data").map(serde_json::Value::take) {
		None | Some(serde_json::Value::Null) => Err(ClientError::MissingData),
		Some(data) => Ok(serde_json::from_value(data)?),
	}
}

/// The server's `message`, or a fallback when the body is not an error body.
fn error_message(status: StatusCode, body: &str) -> String {
	match serde_json::from_str::<RbacErrorResponse>(body) {
		Ok(err) if !err.message.is_empty() => err.message,
		_ if !body.trim().is_empty() => body.trim().to_string(),
		_ => status
			.canonical_reason()
			.unwrap_or("request failed")
			.to_string(),
	}
}

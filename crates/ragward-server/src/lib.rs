// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Ragward authorization server.
//!
//! Serves the group, membership and knowledge base permission API under
//! `/api/rbac`, backed by SQLite.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod bootstrap;
pub mod convert;
pub mod error;
pub mod routes;
pub mod validation;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use bootstrap::DefaultGroups;
pub use error::ServerError;
pub use ragward_server_config::ServerConfig;

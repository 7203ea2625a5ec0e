// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for groups, memberships and knowledge base grants.

mod columns;
pub mod error;
pub mod group;
pub mod knowledge_base;
pub mod permission;
pub mod pool;
pub mod testing;
pub mod user;

pub use error::{DbError, Result};
pub use group::{GroupRepository, GroupStore};
pub use knowledge_base::{KnowledgeBaseRepository, KnowledgeBaseStore};
pub use permission::{PermissionRepository, PermissionStore, PermissionWithGroup, PermissionWithKb};
pub use pool::{create_pool, run_migrations};
pub use user::{UserRepository, UserStore};

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP route handlers.

pub mod admin;
pub mod groups;
pub mod health;
pub mod kbs;
pub mod members;
pub mod permissions;

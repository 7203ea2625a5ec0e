// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Startup bootstrap: default groups and enrollment of existing users.

use ragward_server_auth::{DefaultGroup, GroupId, UserGroup};
use ragward_server_config::RbacConfig;
use ragward_server_db::{DbError, GroupRepository};

/// IDs of the two protected default groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultGroups {
	pub admin: GroupId,
	pub users: GroupId,
}

/// Ensure the administrators and users groups exist.
///
/// Existing default groups are found by their flags, so a renamed default
/// group is reused rather than duplicated. When `enroll_existing_users` is
/// set, every live user without any membership joins the users group.
#[tracing::instrument(skip_all, fields(admin = %config.admin_group_name, users = %config.user_group_name))]
pub async fn ensure_default_groups(
	groups: &GroupRepository,
	config: &RbacConfig,
) -> Result<DefaultGroups, DbError> {
	let admin = groups
		.ensure_system_group(&DefaultGroup::Administrators.build(&config.admin_group_name))
		.await?;
	let users = groups
		.ensure_system_group(&DefaultGroup::Users.build(&config.user_group_name))
		.await?;
	warn_if_renamed(&admin, &config.admin_group_name);
	warn_if_renamed(&users, &config.user_group_name);

	if config.enroll_existing_users {
		let enrolled = groups.enroll_ungrouped_users(&users.id).await?;
		if enrolled > 0 {
			tracing::info!(enrolled, group_id = %users.id, "enrolled ungrouped users into default group");
		}
	}

	Ok(DefaultGroups {
		admin: admin.id,
		users: users.id,
	})
}

fn warn_if_renamed(group: &UserGroup, configured: &str) {
	if group.name != configured {
		tracing::warn!(
			group_id = %group.id,
			current = %group.name,
			configured,
			"default group was renamed; keeping the existing group"
		);
	}
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger events delivered to the runtime

use crate::id::{GroupId, MembershipId, ProjectId, UserGroupId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A data change that a handler reacts to.
///
/// Serializes with `{"type": "result:created", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A result node was created at `/v2/results/{project}/{group}/{user}`.
    /// `result` is the node's content at creation.
    #[serde(rename = "result:created")]
    ResultCreated { project_id: ProjectId, group_id: GroupId, user_id: UserId, result: Value },

    /// Something under `/v2/groupsUsers/{project}/{group}` was written.
    #[serde(rename = "group_users:written")]
    GroupUsersWritten { project_id: ProjectId, group_id: GroupId },

    /// Something under `/v2/users/{user}/contributions` was written.
    #[serde(rename = "contributions:written")]
    ContributionsWritten { user_id: UserId },

    #[serde(rename = "username:written")]
    UsernameWritten { user_id: UserId },

    #[serde(rename = "user_group:written")]
    UserGroupWritten { user_group_id: UserGroupId },

    #[serde(rename = "membership_log:written")]
    MembershipLogWritten { membership_id: MembershipId },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ResultCreated { .. } => "result:created",
            Event::GroupUsersWritten { .. } => "group_users:written",
            Event::ContributionsWritten { .. } => "contributions:written",
            Event::UsernameWritten { .. } => "username:written",
            Event::UserGroupWritten { .. } => "user_group:written",
            Event::MembershipLogWritten { .. } => "membership_log:written",
        }
    }

    /// Key-value pairs for structured logging
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Event::ResultCreated { project_id, group_id, user_id, .. } => vec![
                ("project_id", project_id.to_string()),
                ("group_id", group_id.to_string()),
                ("user_id", user_id.to_string()),
            ],
            Event::GroupUsersWritten { project_id, group_id } => vec![
                ("project_id", project_id.to_string()),
                ("group_id", group_id.to_string()),
            ],
            Event::ContributionsWritten { user_id } | Event::UsernameWritten { user_id } => {
                vec![("user_id", user_id.to_string())]
            }
            Event::UserGroupWritten { user_group_id } => {
                vec![("user_group_id", user_group_id.to_string())]
            }
            Event::MembershipLogWritten { membership_id } => {
                vec![("membership_id", membership_id.to_string())]
            }
        }
    }

    /// One-line summary: `result:created project_id=p1 group_id=g1 user_id=u1`
    pub fn log_summary(&self) -> String {
        let fields = crate::log::format_fields(&self.fields());
        format!("{} {}", self.name(), fields)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

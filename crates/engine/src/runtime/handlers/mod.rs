// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event handling for the runtime
//!
//! Each handler gathers the facts it needs from the store, hands them to a
//! pure decision function, and executes the resulting effects.

pub(crate) mod contribution;
mod finish_count;
mod flags;
mod project_count;
mod tagging;

use super::Runtime;
use crate::error::RuntimeError;
use tally_core::paths::{self, flags as flag_ns};
use tally_core::{DbPath, Event, GroupId, LogContext, ProjectId, UserId};
use tally_storage::Store;

/// Identifies one submitted result
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResultKey {
    pub project_id: ProjectId,
    pub group_id: GroupId,
    pub user_id: UserId,
}

impl ResultKey {
    pub fn path(&self) -> DbPath {
        paths::result(&self.project_id, &self.group_id, &self.user_id)
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(vec![
            ("project_id", self.project_id.to_string()),
            ("group_id", self.group_id.to_string()),
            ("user_id", self.user_id.to_string()),
        ])
    }
}

impl<S: Store> Runtime<S> {
    /// Handle an incoming event and return any produced events
    pub async fn handle_event(&self, event: Event) -> Result<Vec<Event>, RuntimeError> {
        tracing::debug!("handling {}", event.log_summary());

        match event {
            Event::ResultCreated { project_id, group_id, user_id, result } => {
                let key = ResultKey { project_id, group_id, user_id };
                let (_, events) = self.record_contribution(&key, &result).await?;
                Ok(events)
            }
            Event::GroupUsersWritten { project_id, group_id } => {
                self.update_finish_count(&project_id, &group_id).await
            }
            Event::ContributionsWritten { user_id } => self.count_projects(&user_id).await,
            Event::UsernameWritten { user_id } => {
                self.raise_flag(flag_ns::USERS, user_id.as_str()).await
            }
            Event::UserGroupWritten { user_group_id } => {
                self.raise_flag(flag_ns::USER_GROUPS, user_group_id.as_str()).await
            }
            Event::MembershipLogWritten { membership_id } => {
                self.raise_flag(flag_ns::MEMBERSHIP_LOGS, membership_id.as_str()).await
            }
        }
    }
}

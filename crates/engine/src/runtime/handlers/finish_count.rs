// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Group finish-count recomputation

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use serde_json::Value;
use tally_core::{paths, Effect, Event, GroupId, ProjectId, Write};
use tally_storage::Store;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FinishFacts {
    /// Children of the group's completion set
    pub finished: usize,
    pub group_verification: Option<i64>,
    pub project_verification: Option<i64>,
}

impl FinishFacts {
    /// The group override wins over the project default
    pub fn verification_number(&self) -> Option<i64> {
        self.group_verification.or(self.project_verification)
    }

    /// `None` without a verification number or when the difference overflows
    pub fn required_count(&self) -> Option<i64> {
        let finished = i64::try_from(self.finished).ok()?;
        self.verification_number()?.checked_sub(finished)
    }
}

/// Numbers and numeric strings; fractional values are truncated.
pub(crate) fn parse_verification_number(node: Option<&Value>) -> Option<i64> {
    match node? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn decide(project: &ProjectId, group: &GroupId, facts: &FinishFacts) -> Vec<Effect> {
    let finished = facts.finished as u64;
    let finished_path = paths::group_finished_count(project, group);
    match facts.required_count() {
        Some(required) => vec![Effect::Update {
            writes: vec![
                Write::set(finished_path, finished),
                Write::set(paths::group_required_count(project, group), required),
            ],
        }],
        None => vec![Effect::Set { path: finished_path, value: Value::from(finished) }],
    }
}

impl<S: Store> Runtime<S> {
    pub(crate) async fn update_finish_count(
        &self,
        project: &ProjectId,
        group: &GroupId,
    ) -> Result<Vec<Event>, RuntimeError> {
        let store = self.store();
        let finished = store.child_count(&paths::group_users(project, group)).await?;
        let group_node = store.get(&paths::group_verification_number(project, group)).await?;
        let project_node = store.get(&paths::project_verification_number(project)).await?;
        let facts = FinishFacts {
            finished,
            group_verification: parse_verification_number(group_node.as_ref()),
            project_verification: parse_verification_number(project_node.as_ref()),
        };

        match facts.verification_number() {
            None => tracing::warn!(
                project_id = %project,
                group_id = %group,
                finished,
                "no verification number, writing finishedCount only"
            ),
            Some(verification) if facts.required_count().is_none() => tracing::warn!(
                project_id = %project,
                group_id = %group,
                finished,
                verification,
                "requiredCount out of range, writing finishedCount only"
            ),
            Some(_) => {}
        }
        self.execute(decide(project, group, &facts)).await
    }
}

#[cfg(test)]
#[path = "finish_count_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Group contribution recording

use super::ResultKey;
use crate::error::RuntimeError;
use crate::runtime::Runtime;
use serde_json::Value;
use tally_core::{paths, Effect, Event, Malformed, Policy, ProjectInfo, Rejection, Submission, Write};
use tally_storage::Store;

/// What became of a submitted result
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Input unusable; left in place and not counted
    Ignored(Malformed),
    /// Deleted by policy; not counted
    Rejected(Rejection),
    /// Already counted for this group
    Duplicate,
    Recorded,
}

tally_core::simple_display! {
    Outcome {
        Ignored(..) => "ignored",
        Rejected(..) => "rejected",
        Duplicate => "duplicate",
        Recorded => "recorded",
    }
}

impl Outcome {
    /// Whether the result stays in the database as a valid submission
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Duplicate | Outcome::Recorded)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ContributionFacts {
    /// Present only when the client check needs it and the project exists
    pub project: Option<ProjectInfo>,
    /// The user is already in the group's completion set
    pub already_recorded: bool,
}

pub(crate) fn decide(
    policy: &Policy,
    key: &ResultKey,
    submission: &Submission,
    facts: &ContributionFacts,
) -> (Outcome, Vec<Effect>) {
    let verdict = policy
        .check_user(&key.user_id)
        .and_then(|()| policy.check_speed(submission))
        .and_then(|()| policy.check_client(submission, facts.project.as_ref()));
    if let Err(rejection) = verdict {
        return (Outcome::Rejected(rejection), vec![Effect::Remove { path: key.path() }]);
    }
    if facts.already_recorded {
        return (Outcome::Duplicate, Vec::new());
    }

    let (p, g, u) = (&key.project_id, &key.group_id, &key.user_id);
    let tasks = submission.task_count.get() as i64;
    let writes = vec![
        Write::set(paths::user_contribution_group(u, p, g), true),
        Write::set(paths::group_user(p, g, u), true),
        Write::increment(paths::user_task_count(u), tasks),
        Write::increment(paths::user_group_count(u), 1),
        Write::increment(paths::user_project_task_count(u, p), tasks),
    ];
    (Outcome::Recorded, vec![Effect::Update { writes }])
}

impl<S: Store> Runtime<S> {
    pub(crate) async fn record_contribution(
        &self,
        key: &ResultKey,
        result: &Value,
    ) -> Result<(Outcome, Vec<Event>), RuntimeError> {
        let ctx = key.log_context();
        let submission = match Submission::parse(result) {
            Ok(submission) => submission,
            Err(reason) => {
                tracing::info!(%reason, "{}", ctx.line("ignoring malformed result"));
                return Ok((Outcome::Ignored(reason), Vec::new()));
            }
        };

        let facts = self.contribution_facts(key, &submission).await?;
        let (outcome, effects) = decide(self.policy(), key, &submission, &facts);
        let ctx = ctx.with("tasks", submission.task_count);
        match &outcome {
            Outcome::Rejected(rejection) => {
                tracing::warn!(reason = %rejection, detail = ?rejection, "{}", ctx.line("deleting result"))
            }
            Outcome::Duplicate => tracing::info!("{}", ctx.line("contribution already recorded")),
            Outcome::Recorded => tracing::info!("{}", ctx.line("recording contribution")),
            Outcome::Ignored(_) => {}
        }

        let mut events = self.execute(effects).await?;
        if outcome.is_accepted() {
            events.extend(self.tag_result(key).await?);
        }
        Ok((outcome, events))
    }

    async fn contribution_facts(
        &self,
        key: &ResultKey,
        submission: &Submission,
    ) -> Result<ContributionFacts, RuntimeError> {
        let project = if self.policy().needs_project(submission) {
            let node = self.store().get(&paths::project(&key.project_id)).await?;
            node.as_ref().map(ProjectInfo::from_node)
        } else {
            None
        };
        let already_recorded = self
            .store()
            .exists(&paths::group_user(&key.project_id, &key.group_id, &key.user_id))
            .await?;
        Ok(ContributionFacts { project, already_recorded })
    }
}

#[cfg(test)]
#[path = "contribution_tests.rs"]
mod tests;

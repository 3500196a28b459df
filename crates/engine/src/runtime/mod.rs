// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the tally engine

mod handlers;

pub use handlers::contribution::Outcome;

use crate::backfill::{self, Backfill, BackfillOutcome};
use crate::dispatch::{Dispatcher, Hit, Trigger};
use crate::error::RuntimeError;
use crate::executor::Executor;
use tally_core::{
    Change, Effect, Event, GroupId, MembershipId, Policy, ProjectId, UserGroupId, UserId, Write,
};
use tally_storage::Store;

/// Runtime that reacts to store changes
pub struct Runtime<S> {
    pub executor: Executor<S>,
    dispatcher: Dispatcher,
    policy: Policy,
}

impl<S: Store> Runtime<S> {
    pub fn new(store: S, dispatcher: Dispatcher, policy: Policy) -> Self {
        Self { executor: Executor::new(store), dispatcher, policy }
    }

    pub fn store(&self) -> &S {
        self.executor.store()
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Apply writes that originate outside the engine (client app, admin).
    ///
    /// Returns the trigger events the writes produced.
    pub async fn apply_external(&self, writes: Vec<Write>) -> Result<Vec<Event>, RuntimeError> {
        let changes = self.store().apply(writes).await?;
        self.events_for(&changes).await
    }

    /// Execute effects and return the events their changes trigger.
    pub(crate) async fn execute(&self, effects: Vec<Effect>) -> Result<Vec<Event>, RuntimeError> {
        if effects.is_empty() {
            return Ok(Vec::new());
        }
        let changes = self.executor.execute_all(effects).await?;
        self.events_for(&changes).await
    }

    /// Turn applied changes into trigger events.
    pub async fn events_for(&self, changes: &[Change]) -> Result<Vec<Event>, RuntimeError> {
        let mut events = Vec::new();
        for hit in self.dispatcher.hits(changes) {
            if let Some(event) = self.event_for(&hit).await? {
                events.push(event);
            }
        }
        Ok(events)
    }

    async fn event_for(&self, hit: &Hit) -> Result<Option<Event>, RuntimeError> {
        let params = &hit.params;
        let event = match hit.trigger {
            Trigger::ResultCreate => {
                let (Some(p), Some(g), Some(u)) =
                    (params.get("projectId"), params.get("groupId"), params.get("userId"))
                else {
                    return Ok(None);
                };
                // A later write in the same batch may have removed it again
                let Some(result) = self.store().get(&hit.node).await? else {
                    return Ok(None);
                };
                Event::ResultCreated {
                    project_id: ProjectId::new(p),
                    group_id: GroupId::new(g),
                    user_id: UserId::new(u),
                    result,
                }
            }
            Trigger::GroupUsersWrite => match (params.get("projectId"), params.get("groupId")) {
                (Some(p), Some(g)) => Event::GroupUsersWritten {
                    project_id: ProjectId::new(p),
                    group_id: GroupId::new(g),
                },
                _ => return Ok(None),
            },
            Trigger::ContributionsWrite => match params.get("userId") {
                Some(u) => Event::ContributionsWritten { user_id: UserId::new(u) },
                None => return Ok(None),
            },
            Trigger::UsernameWrite => match params.get("userId") {
                Some(u) => Event::UsernameWritten { user_id: UserId::new(u) },
                None => return Ok(None),
            },
            Trigger::UserGroupWrite => match params.get("userGroupId") {
                Some(id) => Event::UserGroupWritten { user_group_id: UserGroupId::new(id) },
                None => return Ok(None),
            },
            Trigger::MembershipLogWrite => match params.get("membershipId") {
                Some(id) => Event::MembershipLogWritten { membership_id: MembershipId::new(id) },
                None => return Ok(None),
            },
        };
        Ok(Some(event))
    }

    /// Run a one-shot backfill over its collection as one atomic update.
    pub async fn backfill(
        &self,
        kind: Backfill,
    ) -> Result<(BackfillOutcome, Vec<Event>), RuntimeError> {
        let collection = self.store().get(&kind.collection()).await?;
        let Some(writes) = backfill::plan(kind, collection.as_ref()) else {
            tracing::info!(backfill = %kind, "collection is empty");
            return Ok((BackfillOutcome::Empty, Vec::new()));
        };
        let updated = writes.len();
        let events = self.execute(vec![Effect::Update { writes }]).await?;
        tracing::info!(backfill = %kind, updated, "backfill complete");
        Ok((BackfillOutcome::Updated(updated), events))
    }
}

#[cfg(test)]
#[path = "../runtime_tests/mod.rs"]
mod tests;

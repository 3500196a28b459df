// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use serde_json::Value;
use tally_core::{paths, Effect, Event, UserId};
use tally_storage::Store;

/// Distinct projects are recounted from scratch on every write.
pub(crate) fn decide(user: &UserId, projects: usize) -> Vec<Effect> {
    vec![Effect::Set { path: paths::user_project_count(user), value: Value::from(projects) }]
}

impl<S: Store> Runtime<S> {
    pub(crate) async fn count_projects(&self, user: &UserId) -> Result<Vec<Event>, RuntimeError> {
        let projects = self.store().child_count(&paths::user_contributions(user)).await?;
        tracing::debug!(user_id = %user, projects, "recounting project contributions");
        self.execute(decide(user, projects)).await
    }
}

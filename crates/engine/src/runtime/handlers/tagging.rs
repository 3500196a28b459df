// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tags accepted results with the submitting user's active user groups

use super::ResultKey;
use crate::error::RuntimeError;
use crate::runtime::Runtime;
use serde_json::{Map, Value};
use tally_core::{paths, Effect, Event, UserGroupId};
use tally_storage::Store;

fn is_active(group: &Value) -> bool {
    group.get("archivedAt").map_or(true, Value::is_null)
}

/// `groups` pairs each membership with its user group record, if any.
pub(crate) fn decide(key: &ResultKey, groups: &[(UserGroupId, Option<Value>)]) -> Vec<Effect> {
    let tag: Map<String, Value> = groups
        .iter()
        .filter(|(_, record)| record.as_ref().is_some_and(is_active))
        .map(|(id, _)| (id.to_string(), Value::Bool(true)))
        .collect();
    if tag.is_empty() {
        return Vec::new();
    }
    let path = paths::result_user_groups(&key.project_id, &key.group_id, &key.user_id);
    vec![Effect::Set { path, value: Value::Object(tag) }]
}

impl<S: Store> Runtime<S> {
    pub(crate) async fn tag_result(&self, key: &ResultKey) -> Result<Vec<Event>, RuntimeError> {
        let memberships = self.store().child_keys(&paths::user_memberships(&key.user_id)).await?;
        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        let mut groups = Vec::with_capacity(memberships.len());
        for id in memberships {
            let id = UserGroupId::new(id);
            let record = self.store().get(&paths::user_group(&id)).await?;
            groups.push((id, record));
        }

        let effects = decide(key, &groups);
        if effects.is_empty() {
            tracing::debug!("{}", key.log_context().line("no active user groups to tag"));
        }
        self.execute(effects).await
    }
}

#[cfg(test)]
#[path = "tagging_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects represent writes the runtime needs to perform

use crate::path::DbPath;
use crate::write::Write;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Effects that need to be executed against the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Replace one node
    Set { path: DbPath, value: Value },

    /// Remove one node (used to discard rejected results)
    Remove { path: DbPath },

    /// Apply several writes as one atomic batch. Either all of them land or
    /// none do.
    Update { writes: Vec<Write> },
}

impl Effect {
    /// Effect name for log lines (e.g., "set", "update")
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Set { .. } => "set",
            Effect::Remove { .. } => "remove",
            Effect::Update { .. } => "update",
        }
    }

    /// Key-value pairs for structured logging
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Set { path, value } => {
                vec![("path", path.to_string()), ("value", value.to_string())]
            }
            Effect::Remove { path } => vec![("path", path.to_string())],
            Effect::Update { writes } => {
                let mut fields = vec![("writes", writes.len().to_string())];
                if let Some(first) = writes.first() {
                    fields.push(("first", first.path.to_string()));
                }
                fields
            }
        }
    }

    /// Whether to log both 'executing' and 'completed' or just one line.
    pub fn verbose(&self) -> bool {
        match self {
            // Flags and recomputed counters are frequent and idempotent
            Effect::Set { .. } => false,
            // Destructive and multi-path writes keep full information
            Effect::Remove { .. } | Effect::Update { .. } => true,
        }
    }

    /// Lower to the batch of writes the store applies atomically.
    pub fn into_writes(self) -> Vec<Write> {
        match self {
            Effect::Set { path, value } => vec![Write::set(path, value)],
            Effect::Remove { path } => vec![Write::remove(path)],
            Effect::Update { writes } => writes,
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;

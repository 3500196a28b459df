// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write operations against the tree and the changes they report

use crate::path::DbPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single mutation at one path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Replace the node. `null` removes it.
    Set { value: Value },
    /// Remove the node and prune empty parents.
    Remove,
    /// Add to a numeric node; a missing node counts as zero.
    Increment { delta: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Write {
    pub path: DbPath,
    #[serde(flatten)]
    pub op: Op,
}

impl Write {
    pub fn set(path: DbPath, value: impl Into<Value>) -> Self {
        Self { path, op: Op::Set { value: value.into() } }
    }

    pub fn remove(path: DbPath) -> Self {
        Self { path, op: Op::Remove }
    }

    pub fn increment(path: DbPath, delta: i64) -> Self {
        Self { path, op: Op::Increment { delta } }
    }

    /// Log-friendly rendering, e.g. `+2 /v2/users/u1/taskContributionCount`
    pub fn summary(&self) -> String {
        match &self.op {
            Op::Set { value } => format!("set {} = {}", self.path, value),
            Op::Remove => format!("remove {}", self.path),
            Op::Increment { delta } => format!("{:+} {}", delta, self.path),
        }
    }
}

/// What a single write did to the node at its path.
///
/// `existed_depth` counts how many leading segments of `path` named nodes
/// that existed before the write. It equals `path.len()` exactly when
/// `before` is `Some`, and lets trigger matching decide whether an ancestor
/// node at a shallower template depth was created by this write.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub path: DbPath,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub existed_depth: usize,
}

impl Change {
    /// Whether the node actually changed
    pub fn is_effective(&self) -> bool {
        self.before != self.after
    }

    /// Whether the node at `depth` (a prefix of `path`) existed before.
    pub fn existed_at(&self, depth: usize) -> bool {
        self.existed_depth >= depth
    }
}

#[cfg(test)]
#[path = "write_tests.rs"]
mod tests;

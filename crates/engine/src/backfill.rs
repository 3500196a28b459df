// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot backfills that derive a normalized key field for every record
//! of a collection.

use serde_json::Value;
use tally_core::{paths, DbPath, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backfill {
    /// `projectTopicKey` from `projectTopic` for every project
    ProjectTopicKey,
    /// `usernameKey` from `username` for every user
    UsernameKey,
}

tally_core::simple_display! {
    Backfill {
        ProjectTopicKey => "project_topic_key",
        UsernameKey => "username_key",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackfillOutcome {
    /// The collection had no records
    Empty,
    /// Number of records given a key
    Updated(usize),
}

impl Backfill {
    pub fn collection(self) -> DbPath {
        match self {
            Backfill::ProjectTopicKey => paths::projects(),
            Backfill::UsernameKey => paths::users(),
        }
    }

    fn source_field(self) -> &'static str {
        match self {
            Backfill::ProjectTopicKey => "projectTopic",
            Backfill::UsernameKey => "username",
        }
    }

    fn target_field(self) -> &'static str {
        match self {
            Backfill::ProjectTopicKey => "projectTopicKey",
            Backfill::UsernameKey => "usernameKey",
        }
    }

    fn key(self, source: &str) -> String {
        match self {
            Backfill::ProjectTopicKey => topic_key(source),
            Backfill::UsernameKey => username_key(source),
        }
    }
}

/// Trimmed, lowercased, inner whitespace collapsed to single spaces
pub fn topic_key(topic: &str) -> String {
    topic.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Trimmed and lowercased
pub fn username_key(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Writes that give each record a key, or `None` if the collection is empty.
///
/// Records without a string source field are skipped.
pub fn plan(kind: Backfill, collection: Option<&Value>) -> Option<Vec<Write>> {
    let records = collection.and_then(Value::as_object).filter(|m| !m.is_empty())?;
    let base = kind.collection();
    Some(
        records
            .iter()
            .filter_map(|(id, record)| {
                let source = record.get(kind.source_field())?.as_str()?;
                let path = base.child(id).child(kind.target_field());
                Some(Write::set(path, kind.key(source)))
            })
            .collect(),
    )
}

#[cfg(test)]
#[path = "backfill_tests.rs"]
mod tests;

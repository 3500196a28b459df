// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Users whose results are always discarded

use crate::id::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denylist(BTreeSet<UserId>);

impl Denylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a denylist file: one user id per line, `#` starts a comment.
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty())
            .map(UserId::from)
            .collect()
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.0.contains(user)
    }

    pub fn insert(&mut self, user: UserId) -> bool {
        self.0.insert(user)
    }

    /// Merge another list into this one
    pub fn extend(&mut self, other: Denylist) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<UserId> for Denylist {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "denylist_tests.rs"]
mod tests;

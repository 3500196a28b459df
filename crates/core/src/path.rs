// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slash-separated paths into the tree

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

/// Characters the realtime database never allows inside a key. `/` only
/// shows up in keys nested inside written values; path parsing splits on it.
const FORBIDDEN: &[char] = &['/', '.', '#', '$', '[', ']'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("invalid key {key:?}: keys may not contain / . # $ [ ]")]
    InvalidKey { key: String },
    #[error("invalid template {template:?}: {reason}")]
    InvalidTemplate { template: String, reason: &'static str },
}

/// A location in the tree, e.g. `/v2/results/p1/g1/u1`.
///
/// Empty segments are dropped while parsing, so `/v2//users/` and `v2/users`
/// name the same node. The root has zero segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DbPath {
    segments: Vec<SmolStr>,
}

impl DbPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a slash-separated path, validating every key.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| validate_key(s).map(|_| SmolStr::new(s)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Build a path from keys that are already known to be valid.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { segments: segments.into_iter().map(|s| SmolStr::new(s.as_ref())).collect() }
    }

    /// Append one key
    pub fn child(&self, key: impl AsRef<str>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(SmolStr::new(key.as_ref()));
        Self { segments }
    }

    /// Append every segment of a relative path
    pub fn join(&self, relative: &DbPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(relative.segments.iter().cloned());
        Self { segments }
    }

    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Final key, `None` for the root
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(SmolStr::as_str)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(self.prefix(self.segments.len() - 1))
    }

    /// The first `depth` segments (the whole path if it is shorter).
    pub fn prefix(&self, depth: usize) -> Self {
        let end = depth.min(self.segments.len());
        Self { segments: self.segments[..end].to_vec() }
    }

    /// Segments after the first `depth`, as a relative path.
    pub fn suffix(&self, depth: usize) -> Self {
        let start = depth.min(self.segments.len());
        Self { segments: self.segments[start..].to_vec() }
    }

    pub fn starts_with(&self, other: &DbPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

/// Reject keys the tree cannot store.
pub fn validate_key(key: &str) -> Result<(), PathError> {
    if key.is_empty() || key.contains(FORBIDDEN) {
        return Err(PathError::InvalidKey { key: key.to_string() });
    }
    Ok(())
}

impl std::fmt::Display for DbPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for DbPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DbPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DbPath> for String {
    fn from(path: DbPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;

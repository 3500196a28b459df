// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger path templates such as `/v2/results/{projectId}/{groupId}/{userId}`

use crate::path::{validate_key, DbPath, PathError};
use smol_str::SmolStr;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Literal(SmolStr),
    Param(SmolStr),
}

impl Part {
    fn matches(&self, segment: &str) -> bool {
        match self {
            Part::Literal(lit) => lit == segment,
            Part::Param(_) => true,
        }
    }
}

/// Values captured by the `{param}` parts of a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<SmolStr, SmolStr>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    parts: Vec<Part>,
}

impl PathTemplate {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let invalid = |reason| PathError::InvalidTemplate { template: raw.to_string(), reason };
        let mut parts = Vec::new();
        for segment in raw.split('/').filter(|s| !s.is_empty()) {
            if let Some(inner) = segment.strip_prefix('{') {
                let name = inner.strip_suffix('}').ok_or_else(|| invalid("unclosed parameter"))?;
                if name.is_empty() || name.contains(['{', '}']) {
                    return Err(invalid("bad parameter name"));
                }
                if parts.iter().any(|p| matches!(p, Part::Param(n) if n == name)) {
                    return Err(invalid("duplicate parameter"));
                }
                parts.push(Part::Param(SmolStr::new(name)));
            } else {
                validate_key(segment)?;
                parts.push(Part::Literal(SmolStr::new(segment)));
            }
        }
        Ok(Self { raw: raw.to_string(), parts })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of segments a matching node path has
    pub fn depth(&self) -> usize {
        self.parts.len()
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Match a path of exactly the template's depth.
    pub fn matches(&self, path: &DbPath) -> Option<Params> {
        if path.len() != self.depth() {
            return None;
        }
        self.capture(path.segments())
    }

    /// Match the first `depth()` segments of a path at least that long.
    pub fn matches_prefix(&self, path: &DbPath) -> Option<Params> {
        if path.len() < self.depth() {
            return None;
        }
        self.capture(&path.segments()[..self.depth()])
    }

    /// Whether a path shorter than the template could be an ancestor of
    /// matching nodes.
    pub fn is_ancestor(&self, path: &DbPath) -> bool {
        path.len() < self.depth()
            && self.parts.iter().zip(path.segments()).all(|(part, seg)| part.matches(seg))
    }

    /// Capture params from segments aligned with the first parts of the template.
    pub fn capture(&self, segments: &[SmolStr]) -> Option<Params> {
        let mut params = BTreeMap::new();
        for (part, segment) in self.parts.iter().zip(segments) {
            match part {
                Part::Literal(lit) if lit != segment => return None,
                Part::Literal(_) => {}
                Part::Param(name) => {
                    params.insert(name.clone(), segment.clone());
                }
            }
        }
        Some(Params(params))
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;

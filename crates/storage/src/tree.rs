// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory hierarchical JSON tree
//!
//! Follows realtime-database semantics: `null` never appears as a stored
//! value, empty maps do not exist (removing the last child prunes the
//! parent), and arrays are stored as maps keyed by index.

use crate::error::StoreError;
use serde_json::{Map, Number, Value};
use smol_str::SmolStr;
use tally_core::path::validate_key;
use tally_core::{Change, DbPath, Op, Write};

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Always an object
    root: Value,
}

impl Default for Tree {
    fn default() -> Self {
        Self { root: Value::Object(Map::new()) }
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a JSON document (e.g. a snapshot or fixture).
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        match normalize(value).map_err(|key| invalid_key(&DbPath::root(), key))? {
            None => Ok(Self::default()),
            Some(root @ Value::Object(_)) => Ok(Self { root }),
            Some(_) => Err(StoreError::InvalidRoot),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.as_object().map_or(true, Map::is_empty)
    }

    pub fn get(&self, path: &DbPath) -> Option<&Value> {
        if path.is_root() && self.is_empty() {
            return None;
        }
        let mut node = &self.root;
        for segment in path.segments() {
            node = node.as_object()?.get(segment.as_str())?;
        }
        Some(node)
    }

    pub fn exists(&self, path: &DbPath) -> bool {
        self.get(path).is_some()
    }

    /// Number of direct children (0 for leaves and missing nodes)
    pub fn child_count(&self, path: &DbPath) -> usize {
        self.get(path).and_then(Value::as_object).map_or(0, Map::len)
    }

    pub fn child_keys(&self, path: &DbPath) -> Vec<String> {
        self.get(path)
            .and_then(Value::as_object)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Apply a batch of writes atomically.
    ///
    /// Writes are applied in order. If any write fails, every earlier write
    /// of the batch is rolled back before the error is returned.
    pub fn apply(&mut self, writes: &[Write]) -> Result<Vec<Change>, StoreError> {
        let mut changes = Vec::with_capacity(writes.len());
        let mut undo = Vec::with_capacity(writes.len());
        for write in writes {
            let restore = self.restore_point(&write.path);
            match self.apply_one(write) {
                Ok(change) => {
                    undo.push(restore);
                    changes.push(change);
                }
                Err(e) => {
                    for (path, value) in undo.into_iter().rev() {
                        self.restore(&path, value);
                    }
                    return Err(e);
                }
            }
        }
        Ok(changes)
    }

    /// Validates before mutating, so a failed write leaves the tree untouched.
    fn apply_one(&mut self, write: &Write) -> Result<Change, StoreError> {
        let path = &write.path;
        let existed_depth = self.existed_depth(path);
        let before = self.get(path).cloned();
        let next = match &write.op {
            Op::Set { value } => normalize(value.clone()).map_err(|key| invalid_key(path, key))?,
            Op::Remove => None,
            Op::Increment { delta } => Some(increment(path, before.as_ref(), *delta)?),
        };

        if path.is_root() {
            self.root = match &next {
                None => Value::Object(Map::new()),
                Some(root @ Value::Object(_)) => root.clone(),
                Some(_) => return Err(StoreError::InvalidRoot),
            };
        } else {
            match &next {
                Some(value) => self.insert(path, value.clone()),
                None => self.remove(path),
            }
        }

        Ok(Change { path: path.clone(), before, after: next, existed_depth })
    }

    /// Count of leading path segments naming nodes that currently exist.
    fn existed_depth(&self, path: &DbPath) -> usize {
        let mut node = &self.root;
        let mut depth = 0;
        for segment in path.segments() {
            match node.as_object().and_then(|m| m.get(segment.as_str())) {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }
        depth
    }

    /// The node to put back if a write to `path` must be undone.
    ///
    /// Usually `path` itself. When a scalar ancestor would be replaced by a
    /// map, the undo target is that ancestor and its old value.
    fn restore_point(&self, path: &DbPath) -> (DbPath, Option<Value>) {
        let mut node = &self.root;
        for (i, segment) in path.segments().iter().enumerate() {
            match node.as_object().and_then(|m| m.get(segment.as_str())) {
                None => return (path.clone(), None),
                Some(child) if i + 1 < path.len() && !child.is_object() => {
                    return (path.prefix(i + 1), Some(child.clone()));
                }
                Some(child) => node = child,
            }
        }
        (path.clone(), self.get(path).cloned())
    }

    fn restore(&mut self, path: &DbPath, value: Option<Value>) {
        if path.is_root() {
            self.root = value.unwrap_or_else(|| Value::Object(Map::new()));
            return;
        }
        match value {
            Some(value) => self.insert(path, value),
            None => self.remove(path),
        }
    }

    fn insert(&mut self, path: &DbPath, value: Value) {
        let Some((key, parents)) = path.segments().split_last() else {
            return;
        };
        let mut node = &mut self.root;
        for segment in parents {
            node = ensure_object(node)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        ensure_object(node).insert(key.to_string(), value);
    }

    fn remove(&mut self, path: &DbPath) {
        remove_at(&mut self.root, path.segments());
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    match node {
        Value::Object(map) => map,
        _ => {
            *node = Value::Object(Map::new());
            ensure_object(node)
        }
    }
}

/// Remove the node at `segments` below `node`, pruning maps left empty.
fn remove_at(node: &mut Value, segments: &[SmolStr]) -> Option<Value> {
    let (first, rest) = segments.split_first()?;
    let map = node.as_object_mut()?;
    if rest.is_empty() {
        return map.remove(first.as_str());
    }
    let child = map.get_mut(first.as_str())?;
    let removed = remove_at(child, rest);
    if child.as_object().is_some_and(Map::is_empty) {
        map.remove(first.as_str());
    }
    removed
}

/// Drop nulls and empty maps, and store arrays as index-keyed maps.
///
/// Every object key must be a valid path key, or the node would be
/// unreachable by any path. Fails with the first offending key.
fn normalize(value: Value) -> Result<Option<Value>, String> {
    let map = match value {
        Value::Null => return Ok(None),
        Value::Array(items) => {
            let mut map = Map::new();
            for (i, v) in items.into_iter().enumerate() {
                if let Some(v) = normalize(v)? {
                    map.insert(i.to_string(), v);
                }
            }
            map
        }
        Value::Object(entries) => {
            let mut map = Map::new();
            for (k, v) in entries {
                if validate_key(&k).is_err() {
                    return Err(k);
                }
                if let Some(v) = normalize(v)? {
                    map.insert(k, v);
                }
            }
            map
        }
        other => return Ok(Some(other)),
    };
    Ok((!map.is_empty()).then_some(Value::Object(map)))
}

fn invalid_key(path: &DbPath, key: String) -> StoreError {
    StoreError::InvalidKey { path: path.clone(), key }
}

fn increment(path: &DbPath, current: Option<&Value>, delta: i64) -> Result<Value, StoreError> {
    match current {
        None => Ok(Value::from(delta)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i
                .checked_add(delta)
                .map(Value::from)
                .ok_or_else(|| StoreError::Overflow { path: path.clone() }),
            None => n
                .as_f64()
                .and_then(|f| Number::from_f64(f + delta as f64))
                .map(Value::Number)
                .ok_or_else(|| StoreError::NotANumber { path: path.clone() }),
        },
        Some(_) => Err(StoreError::NotANumber { path: path.clone() }),
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;

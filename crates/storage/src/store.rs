// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database access seam used by the engine

use crate::error::StoreError;
use crate::tree::Tree;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tally_core::{Change, DbPath, Write};

/// Read and write access to the hierarchical database.
///
/// `apply` is atomic: either every write of the batch lands or none does.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    async fn get(&self, path: &DbPath) -> Result<Option<Value>, StoreError>;

    async fn exists(&self, path: &DbPath) -> Result<bool, StoreError> {
        Ok(self.get(path).await?.is_some())
    }

    /// Number of direct children of the node at `path`
    async fn child_count(&self, path: &DbPath) -> Result<usize, StoreError>;

    async fn child_keys(&self, path: &DbPath) -> Result<Vec<String>, StoreError>;

    async fn apply(&self, writes: Vec<Write>) -> Result<Vec<Change>, StoreError>;
}

/// Process-local store backed by a [`Tree`] behind a mutex
#[derive(Clone, Default)]
pub struct MemoryStore {
    tree: Arc<Mutex<Tree>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(tree: Tree) -> Self {
        Self { tree: Arc::new(Mutex::new(tree)), ..Self::default() }
    }

    /// Clone of the whole database document
    pub fn to_value(&self) -> Value {
        self.tree.lock().as_value().clone()
    }

    /// Make every subsequent `apply` fail with [`StoreError::Unavailable`].
    #[cfg(any(test, feature = "test-support"))]
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, path: &DbPath) -> Result<Option<Value>, StoreError> {
        Ok(self.tree.lock().get(path).cloned())
    }

    async fn exists(&self, path: &DbPath) -> Result<bool, StoreError> {
        Ok(self.tree.lock().exists(path))
    }

    async fn child_count(&self, path: &DbPath) -> Result<usize, StoreError> {
        Ok(self.tree.lock().child_count(path))
    }

    async fn child_keys(&self, path: &DbPath) -> Result<Vec<String>, StoreError> {
        Ok(self.tree.lock().child_keys(path))
    }

    async fn apply(&self, writes: Vec<Write>) -> Result<Vec<Change>, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write injection enabled".to_string()));
        }
        let changes = self.tree.lock().apply(&writes)?;
        tracing::trace!(writes = writes.len(), "applied batch");
        Ok(changes)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

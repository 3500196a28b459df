// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use tally_core::{Change, Effect};
use tally_storage::{Store, StoreError};
use thiserror::Error;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Applies effects to the store
#[derive(Clone)]
pub struct Executor<S> {
    store: S,
}

impl<S: Store> Executor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Execute a single effect with tracing
    ///
    /// Returns the changes the store reported, for trigger dispatch.
    pub async fn execute(&self, effect: Effect) -> Result<Vec<Change>, ExecuteError> {
        let info = tally_core::format_fields(&effect.fields());
        let op = effect.name();
        let verbose = effect.verbose();
        if verbose {
            tracing::info!("executing effect={} {}", op, info);
        }

        let start = std::time::Instant::now();
        let result = self.store.apply(effect.into_writes()).await.map_err(ExecuteError::from);
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if verbose {
            match &result {
                Ok(changes) => tracing::info!(changes = changes.len(), elapsed_ms, "completed"),
                Err(e) => tracing::error!(error = %e, elapsed_ms, "failed"),
            }
        } else {
            match &result {
                Ok(changes) => tracing::info!(
                    changes = changes.len(),
                    elapsed_ms,
                    "executed effect={} {}",
                    op,
                    info
                ),
                Err(e) => tracing::error!(error = %e, elapsed_ms, "error effect={} {}", op, info),
            }
        }

        result
    }

    /// Execute effects in order, stopping at the first failure.
    pub async fn execute_all(&self, effects: Vec<Effect>) -> Result<Vec<Change>, ExecuteError> {
        let mut changes = Vec::new();
        for effect in effects {
            changes.extend(self.execute(effect).await?);
        }
        Ok(changes)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

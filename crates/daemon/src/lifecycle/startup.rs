// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Instant;

use tally_engine::{Dispatcher, Runtime};
use tally_storage::{load_snapshot, MemoryStore, Tree};
use tokio::net::TcpListener;
use tracing::info;

use super::{Daemon, LifecycleError, StartupResult};
use crate::config::Config;
use crate::event_bus::{self, DEFAULT_CAPACITY};

/// Restore the tree, wire up the runtime and bind the HTTP listener.
pub async fn startup(config: Config) -> Result<StartupResult, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    let tree = match load_snapshot(&config.snapshot_path)? {
        Some(snapshot) => {
            info!(
                path = %config.snapshot_path.display(),
                created_at = %snapshot.created_at,
                "restored tree from snapshot"
            );
            Tree::from_value(snapshot.tree)?
        }
        None => {
            info!("no snapshot found, starting with an empty tree");
            Tree::new()
        }
    };

    let store = MemoryStore::from_tree(tree);
    let runtime = Arc::new(Runtime::new(store, Dispatcher::standard()?, config.policy.clone()));
    info!(
        denylisted = config.policy.denylist.len(),
        min_seconds_per_task = config.policy.min_seconds_per_task,
        "policy loaded"
    );

    let (event_bus, event_reader) = event_bus::channel(DEFAULT_CAPACITY);
    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.listen, e))?;

    Ok(StartupResult {
        daemon: Daemon { config, runtime, event_bus, start_time: Instant::now() },
        listener,
        event_reader,
    })
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;

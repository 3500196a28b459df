// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Instant;

use tally_storage::{save_snapshot, MemoryStore, Snapshot, SnapshotError};

/// Writes the whole tree to the snapshot file.
#[derive(Clone)]
pub struct Checkpointer {
    store: MemoryStore,
    path: PathBuf,
}

impl Checkpointer {
    pub fn new(store: MemoryStore, path: PathBuf) -> Self {
        Self { store, path }
    }

    /// Blocking; call from `spawn_blocking` inside the runtime.
    pub fn save(&self) -> Result<(), SnapshotError> {
        let start = Instant::now();
        let snapshot = Snapshot::new(self.store.to_value());
        save_snapshot(&self.path, &snapshot)?;
        tracing::debug!(
            path = %self.path.display(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "snapshot written"
        );
        Ok(())
    }
}

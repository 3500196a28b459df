// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for tally: the hierarchical tree and its snapshots

mod error;
mod snapshot;
mod store;
mod tree;

pub use error::StoreError;
pub use snapshot::{load_snapshot, save_snapshot, Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
pub use store::{MemoryStore, Store};
pub use tree::Tree;

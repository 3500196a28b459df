// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tally_core::{DbPath, Policy};
use tally_engine::{Dispatcher, Runtime};
use tally_storage::{MemoryStore, Tree};

use super::DaemonRuntime;
use crate::config::{Config, FileConfig, Overrides};

/// Config rooted at `dir`, listening on an ephemeral port
pub(crate) fn test_config(dir: &Path) -> Config {
    let overrides = Overrides {
        state_dir: Some(dir.to_path_buf()),
        listen: Some(([127, 0, 0, 1], 0).into()),
        ..Overrides::default()
    };
    Config::resolve(FileConfig::default(), overrides, None).unwrap()
}

pub(crate) fn test_runtime(tree: Value) -> Arc<DaemonRuntime> {
    let store = MemoryStore::from_tree(Tree::from_value(tree).unwrap());
    Arc::new(Runtime::new(store, Dispatcher::standard().unwrap(), Policy::default()))
}

pub(crate) fn path(raw: &str) -> DbPath {
    DbPath::parse(raw).unwrap()
}

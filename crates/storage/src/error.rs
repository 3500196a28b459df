// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tally_core::DbPath;
use thiserror::Error;

/// Errors from tree reads and writes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("cannot increment non-numeric node at {path}")]
    NotANumber { path: DbPath },
    #[error("increment overflows counter at {path}")]
    Overflow { path: DbPath },
    #[error("invalid key {key:?} in value written to {path}")]
    InvalidKey { path: DbPath, key: String },
    #[error("root must be an object")]
    InvalidRoot,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

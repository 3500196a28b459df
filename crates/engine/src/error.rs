// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime error types

use crate::executor::ExecuteError;
use tally_core::PathError;
use tally_storage::StoreError;
use thiserror::Error;

/// Errors that can occur in the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
    #[error("path error: {0}")]
    Path(#[from] PathError),
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for `tallyd`

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info";

const LOG_FILE_PREFIX: &str = "tallyd.log";

/// Keeps the file writer flushing; drop it only at exit.
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber: stderr always, plus a daily rolling file
/// under `log_dir` when one is configured.
pub fn init(log_dir: Option<&Path>) -> Result<LogGuard, TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(LogGuard { _file: guard })
}

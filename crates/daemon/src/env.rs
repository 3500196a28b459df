// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Resolve state directory: TALLY_STATE_DIR > XDG_STATE_HOME/tally > ~/.local/state/tally
pub fn state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("tally"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".local/state/tally"))
}

/// Explicit state directory (`TALLY_STATE_DIR`), without the XDG fallbacks
pub fn state_dir_override() -> Option<PathBuf> {
    std::env::var("TALLY_STATE_DIR").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Config file path (`TALLY_CONFIG`)
pub fn config_path() -> Option<PathBuf> {
    std::env::var("TALLY_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// HTTP listen address (`TALLY_LISTEN`). Unparseable values are ignored.
pub fn listen_addr() -> Option<SocketAddr> {
    std::env::var("TALLY_LISTEN").ok().and_then(|s| s.parse::<SocketAddr>().ok())
}

/// Directory for daily log files (`TALLY_LOG_DIR`)
pub fn log_dir() -> Option<PathBuf> {
    std::env::var("TALLY_LOG_DIR").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Snapshot checkpoint interval override (`TALLY_CHECKPOINT_SECS`)
pub fn checkpoint_interval() -> Option<Duration> {
    std::env::var("TALLY_CHECKPOINT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Vandalism threshold override (`TALLY_MIN_SECONDS_PER_TASK`)
pub fn min_seconds_per_task() -> Option<f64> {
    std::env::var("TALLY_MIN_SECONDS_PER_TASK")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|f| f.is_finite() && *f >= 0.0)
}

/// Denylist file override (`TALLY_DENYLIST_FILE`)
pub fn denylist_file() -> Option<PathBuf> {
    std::env::var("TALLY_DENYLIST_FILE").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Shutdown drain timeout (default 5s, configurable via `TALLY_DRAIN_TIMEOUT_MS`).
pub fn drain_timeout() -> Duration {
    std::env::var("TALLY_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

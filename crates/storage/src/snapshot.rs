// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence.
//!
//! A snapshot is the whole database document, zstd-compressed JSON. Saves
//! go through a temp file and rename so a crash never leaves a torn file,
//! and the previous snapshot is kept as a rotating `.bak`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

const ZSTD_LEVEL: i32 = 3;
const MAX_BAK_FILES: u32 = 3;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {found} (expected <= {CURRENT_SNAPSHOT_VERSION})")]
    UnsupportedVersion { found: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    /// The complete database document
    pub tree: Value,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(tree: Value) -> Self {
        Self { version: CURRENT_SNAPSHOT_VERSION, tree, created_at: Utc::now() }
    }
}

/// Write `snapshot` to `path`, rotating the previous file to `.bak`.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec(snapshot)?;
    let compressed = zstd::stream::encode_all(json.as_slice(), ZSTD_LEVEL)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, compressed)?;
    if path.exists() {
        fs::rename(path, rotate_bak_path(path))?;
    }
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Load the snapshot at `path`, or `None` if no snapshot has been written.
pub fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, SnapshotError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let json = zstd::stream::decode_all(bytes.as_slice())?;
    let snapshot: Snapshot = serde_json::from_slice(&json)?;
    if snapshot.version > CURRENT_SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion { found: snapshot.version });
    }
    Ok(Some(snapshot))
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;

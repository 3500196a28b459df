// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration
//!
//! Sources in increasing precedence: built-in defaults, the TOML config
//! file, `TALLY_*` environment variables, command-line flags.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tally_core::{Denylist, Policy, UserId};
use thiserror::Error;

use crate::env;

pub const DEFAULT_LISTEN: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 9400));
pub const DEFAULT_CHECKPOINT_INTERVAL: Duration = Duration::from_secs(60);
const SNAPSHOT_FILE: &str = "snapshot.json.zst";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not determine state directory")]
    NoStateDir,

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

/// Contents of the TOML config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub listen: Option<SocketAddr>,
    pub state_dir: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
    pub checkpoint_interval_secs: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub policy: PolicySection,
}

/// `[policy]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicySection {
    pub min_seconds_per_task: Option<f64>,
    pub validate_project_type: Option<i64>,
    /// Inline user ids
    pub denylist: Vec<String>,
    /// One user id per line, merged with the inline list
    pub denylist_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        Self::parse(&read_to_string(path)?)
    }
}

/// Values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub listen: Option<SocketAddr>,
    pub log_dir: Option<PathBuf>,
    pub checkpoint_interval: Option<Duration>,
    pub min_seconds_per_task: Option<f64>,
    pub denylist_file: Option<PathBuf>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            config_path: env::config_path(),
            state_dir: env::state_dir_override(),
            listen: env::listen_addr(),
            log_dir: env::log_dir(),
            checkpoint_interval: env::checkpoint_interval(),
            min_seconds_per_task: env::min_seconds_per_task(),
            denylist_file: env::denylist_file(),
        }
    }

    /// Fill fields left unset from `fallback`.
    pub fn or(self, fallback: Overrides) -> Self {
        Self {
            config_path: self.config_path.or(fallback.config_path),
            state_dir: self.state_dir.or(fallback.state_dir),
            listen: self.listen.or(fallback.listen),
            log_dir: self.log_dir.or(fallback.log_dir),
            checkpoint_interval: self.checkpoint_interval.or(fallback.checkpoint_interval),
            min_seconds_per_task: self.min_seconds_per_task.or(fallback.min_seconds_per_task),
            denylist_file: self.denylist_file.or(fallback.denylist_file),
        }
    }
}

/// Resolved daemon configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP listen address
    pub listen: SocketAddr,
    /// Root state directory (e.g. ~/.local/state/tally)
    pub state_dir: PathBuf,
    /// Compressed tree snapshot
    pub snapshot_path: PathBuf,
    /// How often the tree is checkpointed to the snapshot
    pub checkpoint_interval: Duration,
    /// Daily log files go here when set
    pub log_dir: Option<PathBuf>,
    pub policy: Policy,
}

impl Config {
    /// Load configuration for the daemon.
    ///
    /// `cli` comes from command-line flags and wins over the environment.
    pub fn load(cli: Overrides) -> Result<Self, ConfigError> {
        let overrides = cli.or(Overrides::from_env());
        let file = match &overrides.config_path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, overrides, env::state_dir())
    }

    /// Combine already-gathered sources.
    pub fn resolve(
        file: FileConfig,
        overrides: Overrides,
        default_state_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let state_dir = overrides
            .state_dir
            .or(file.state_dir)
            .or(default_state_dir)
            .ok_or(ConfigError::NoStateDir)?;

        let file_interval = match file.checkpoint_interval_secs {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    key: "checkpoint_interval_secs",
                    reason: "must be positive",
                })
            }
            secs => secs.map(Duration::from_secs),
        };

        let policy = file.policy.into_policy(overrides.min_seconds_per_task, overrides.denylist_file)?;

        Ok(Self {
            listen: overrides.listen.or(file.listen).unwrap_or(DEFAULT_LISTEN),
            snapshot_path: file.snapshot_path.unwrap_or_else(|| state_dir.join(SNAPSHOT_FILE)),
            checkpoint_interval: overrides
                .checkpoint_interval
                .or(file_interval)
                .unwrap_or(DEFAULT_CHECKPOINT_INTERVAL),
            log_dir: overrides.log_dir.or(file.log_dir),
            state_dir,
            policy,
        })
    }
}

impl PolicySection {
    fn into_policy(
        self,
        min_seconds_override: Option<f64>,
        denylist_file_override: Option<PathBuf>,
    ) -> Result<Policy, ConfigError> {
        let mut policy = Policy::default();

        if let Some(min) = min_seconds_override.or(self.min_seconds_per_task) {
            if !min.is_finite() || min < 0.0 {
                return Err(ConfigError::Invalid {
                    key: "min_seconds_per_task",
                    reason: "must be a non-negative number",
                });
            }
            policy.min_seconds_per_task = min;
        }
        if let Some(project_type) = self.validate_project_type {
            policy.validate_project_type = project_type;
        }

        policy.denylist = self
            .denylist
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(UserId::new)
            .collect();
        if let Some(path) = denylist_file_override.or(self.denylist_file) {
            policy.denylist.extend(Denylist::parse(&read_to_string(&path)?));
        }
        Ok(policy)
    }
}

fn read_to_string(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

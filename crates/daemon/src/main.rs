// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tallyd: trigger-driven contribution counters over an in-memory tree

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tally_daemon::{logging, Config, Overrides};
use tracing::info;

#[derive(Parser)]
#[command(name = "tallyd", version)]
#[command(about = "Contribution counter daemon")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// State directory holding the snapshot
    #[arg(long, env = "TALLY_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// HTTP listen address (falls back to TALLY_LISTEN, ignored when unparseable)
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Write daily log files here as well as stderr
    #[arg(long, env = "TALLY_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn into_overrides(self) -> Overrides {
        Overrides {
            config_path: self.config,
            state_dir: self.state_dir,
            listen: self.listen,
            log_dir: self.log_dir,
            ..Overrides::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.into_overrides()).context("loading configuration")?;

    let _log_guard = logging::init(config.log_dir.as_deref()).context("installing logger")?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        state_dir = %config.state_dir.display(),
        "Starting tallyd"
    );

    tally_daemon::run(config).await.context("daemon failed")?;
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

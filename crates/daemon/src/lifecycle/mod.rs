// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, event loop, checkpoints, shutdown.

mod checkpoint;
mod startup;
pub use checkpoint::Checkpointer;
pub use startup::startup;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tally_core::{Event, EventId, PathError};
use tally_engine::Runtime;
use tally_storage::{MemoryStore, SnapshotError, StoreError};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::event_bus::{EventBus, EventReader};
use crate::http::{self, AppState};

/// Daemon runtime with the concrete store type
pub type DaemonRuntime = Runtime<MemoryStore>;

/// Daemon state during operation.
pub struct Daemon {
    pub config: Config,
    /// Runtime for event processing (shared with the HTTP handlers)
    pub runtime: Arc<DaemonRuntime>,
    /// Feeds the event loop
    pub event_bus: EventBus,
    /// When daemon started
    pub start_time: Instant,
}

/// Result of daemon startup: the daemon state plus what the tasks own.
pub struct StartupResult {
    pub daemon: Daemon,
    /// Bound HTTP listener to serve on
    pub listener: TcpListener,
    /// Event reader for the event loop
    pub event_reader: EventReader,
}

impl Daemon {
    pub fn checkpointer(&self) -> Checkpointer {
        Checkpointer::new(self.runtime.store().clone(), self.config.snapshot_path.clone())
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(Arc::clone(&self.runtime), self.event_bus.clone(), self.start_time)
    }

    /// Shutdown the daemon, saving a final snapshot so no write is lost.
    pub fn shutdown(&self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");
        self.checkpointer().save()?;
        info!(path = %self.config.snapshot_path.display(), "saved final shutdown snapshot");
        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Run the daemon until SIGINT/SIGTERM.
pub async fn run(config: Config) -> Result<(), LifecycleError> {
    let StartupResult { daemon, listener, event_reader } = startup(config).await?;
    info!(addr = %listener.local_addr()?, "tallyd listening");

    let cancel = CancellationToken::new();
    let engine = tokio::spawn(event_loop(Arc::clone(&daemon.runtime), event_reader, cancel.clone()));
    let checkpoints = tokio::spawn(checkpoint_loop(
        daemon.checkpointer(),
        daemon.config.checkpoint_interval,
        cancel.clone(),
    ));

    let served = axum::serve(listener, http::router(daemon.app_state()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    cancel.cancel();
    match tokio::time::timeout(crate::env::drain_timeout(), engine).await {
        Ok(Ok(handled)) => info!(handled, "event loop stopped"),
        Ok(Err(e)) => error!(error = %e, "event loop task failed"),
        Err(_) => warn!("event loop did not drain before the timeout"),
    }
    if let Err(e) = checkpoints.await {
        warn!(error = %e, "checkpoint task failed");
    }

    daemon.shutdown()?;
    served?;
    Ok(())
}

/// Handle one event and every event it cascades into.
///
/// A failed handler is logged and its event dropped; siblings still run.
/// Returns the number of events handled successfully.
pub async fn process_event(runtime: &DaemonRuntime, event: Event) -> usize {
    let batch = EventId::generate();
    let mut queue = VecDeque::from([event]);
    let mut handled = 0;
    while let Some(event) = queue.pop_front() {
        let summary = event.log_summary();
        match runtime.handle_event(event).await {
            Ok(next) => {
                handled += 1;
                queue.extend(next);
            }
            Err(e) => error!(batch = %batch, error = %e, "failed to handle {summary}"),
        }
    }
    debug!(batch = %batch, handled, "event batch done");
    handled
}

/// Consume the bus until cancelled, then finish whatever is already queued.
pub async fn event_loop(
    runtime: Arc<DaemonRuntime>,
    mut reader: EventReader,
    cancel: CancellationToken,
) -> usize {
    let mut handled = 0;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = reader.recv() => match event {
                Some(event) => handled += process_event(&runtime, event).await,
                None => return handled,
            },
        }
    }
    while let Some(event) = reader.try_recv() {
        handled += process_event(&runtime, event).await;
    }
    handled
}

async fn checkpoint_loop(checkpointer: Checkpointer, every: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately
    interval.tick().await;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let checkpointer = checkpointer.clone();
                match tokio::task::spawn_blocking(move || checkpointer.save()).await {
                    Ok(Ok(())) => debug!("checkpoint saved"),
                    Ok(Err(e)) => warn!(error = %e, "checkpoint failed"),
                    Err(e) => warn!(error = %e, "checkpoint task failed"),
                }
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to bind {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Snapshot does not hold a valid tree: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid trigger template: {0}")]
    Template(#[from] PathError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel carrying trigger events from the HTTP surface to the event loop.

use tally_core::Event;
use thiserror::Error;
use tokio::sync::mpsc;

/// Pending events the loop can fall behind by before senders wait
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Error)]
#[error("event loop is not running")]
pub struct EventBusClosed;

/// Sending half, cloned into every request handler
#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::Sender<Event>,
}

/// Receiving half, owned by the event loop
pub struct EventReader {
    rx: mpsc::Receiver<Event>,
}

pub fn channel(capacity: usize) -> (EventBus, EventReader) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventBus { tx }, EventReader { rx })
}

impl EventBus {
    pub async fn send(&self, event: Event) -> Result<(), EventBusClosed> {
        self.tx.send(event).await.map_err(|_| EventBusClosed)
    }

    /// Send events in order, stopping at the first failure.
    pub async fn publish(&self, events: Vec<Event>) -> Result<(), EventBusClosed> {
        for event in events {
            self.send(event).await?;
        }
        Ok(())
    }
}

impl EventReader {
    /// Next event, or `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// An already-queued event, without waiting
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

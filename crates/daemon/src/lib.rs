// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tally daemon library
//!
//! Exposes the pieces `tallyd` is assembled from so they can be tested
//! without a network listener.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod event_bus;
pub mod http;
pub mod lifecycle;
pub mod logging;

pub use config::{Config, ConfigError, Overrides};
pub use lifecycle::{run, startup, Daemon, DaemonRuntime, LifecycleError, StartupResult};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Trigger engine for tally
//!
//! Changes applied to the store are matched against trigger bindings by the
//! [`Dispatcher`], which turns them into [`Event`](tally_core::Event)s. The
//! [`Runtime`] handles each event by gathering facts from the store, deciding
//! on effects with pure functions, and applying them through the [`Executor`].

pub mod backfill;
pub mod dispatch;
mod error;
mod executor;
mod runtime;

#[cfg(test)]
mod test_helpers;

pub use backfill::{Backfill, BackfillOutcome};
pub use dispatch::{Dispatcher, Hit, Trigger, TriggerKind};
pub use error::RuntimeError;
pub use executor::{ExecuteError, Executor};
pub use runtime::{Outcome, Runtime};

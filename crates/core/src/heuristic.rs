// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mapping-speed vandalism heuristic

use chrono::{DateTime, Utc};
use std::num::NonZeroUsize;

/// Below this many seconds per task a submission is not a human mapping.
pub const DEFAULT_MIN_SECONDS_PER_TASK: f64 = 0.125;

/// Seconds spent per task between `start` and `end`.
pub fn mapping_speed(task_count: NonZeroUsize, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let elapsed = (end - start).num_milliseconds() as f64 / 1000.0;
    elapsed / task_count.get() as f64
}

pub fn is_vandalism(seconds_per_task: f64, min_seconds_per_task: f64) -> bool {
    seconds_per_task < min_seconds_per_task
}

#[cfg(test)]
#[path = "heuristic_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result fixtures and proptest strategies shared by crate tests.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map, Value};

/// Start time used by every fixture
pub const FIXTURE_START: &str = "2024-01-01T00:00:00Z";

/// A result node with `task_count` tasks mapped over `elapsed_ms`.
pub fn result_node(task_count: usize, elapsed_ms: i64) -> Value {
    let tasks: Map<String, Value> =
        (1..=task_count).map(|i| (format!("t{i}"), json!(i % 3))).collect();
    let start = DateTime::parse_from_rfc3339(FIXTURE_START)
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_default();
    let end = start + Duration::milliseconds(elapsed_ms);
    json!({
        "results": tasks,
        "startTime": FIXTURE_START,
        "endTime": end.to_rfc3339(),
    })
}

/// Same as [`result_node`] with an `appVersion` field.
pub fn result_node_with_version(task_count: usize, elapsed_ms: i64, version: &str) -> Value {
    let mut node = result_node(task_count, elapsed_ms);
    node["appVersion"] = json!(version);
    node
}

/// Proptest strategies for property-based testing.
pub mod strategies {
    use proptest::prelude::*;
    use serde_json::Value;

    /// Keys the tree accepts
    pub fn arb_key() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-]{1,12}"
    }

    /// Result nodes mapped at or above `min_seconds_per_task`
    pub fn arb_plausible_result(min_seconds_per_task: f64) -> impl Strategy<Value = (usize, Value)> {
        (1usize..40, 0u32..5_000).prop_map(move |(tasks, slack_ms)| {
            let floor = (tasks as f64 * min_seconds_per_task * 1000.0).ceil() as i64;
            (tasks, super::result_node(tasks, floor + i64::from(slack_ms)))
        })
    }

    /// Result nodes mapped strictly below `min_seconds_per_task`
    pub fn arb_vandal_result(min_seconds_per_task: f64) -> impl Strategy<Value = Value> {
        (1usize..40, 0.0f64..0.99).prop_map(move |(tasks, fraction)| {
            let budget_ms = tasks as f64 * min_seconds_per_task * 1000.0;
            let elapsed = (budget_ms * fraction).floor() as i64;
            super::result_node(tasks, elapsed.min(budget_ms.ceil() as i64 - 1))
        })
    }

    pub fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            "[a-z ]{0,8}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop::collection::btree_map(arb_key(), inner, 1..4)
                .prop_map(|m| Value::Object(m.into_iter().collect()))
        })
    }
}

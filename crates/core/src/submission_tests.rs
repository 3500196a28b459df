// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn parses_complete_result() {
    let sub = Submission::parse(&json!({
        "results": {"t1": "a", "t2": "b"},
        "startTime": "2024-01-01T00:00:00Z",
        "endTime": "2024-01-01T00:00:10Z",
        "appVersion": "1.2.3",
    }))
    .unwrap();
    assert_eq!(sub.task_count.get(), 2);
    assert_eq!((sub.end_time - sub.start_time).num_seconds(), 10);
    assert_eq!(sub.app_version.as_deref(), Some("1.2.3"));
}

#[yare::parameterized(
    results    = { json!({"startTime": "2024-01-01T00:00:00Z", "endTime": "2024-01-01T00:00:10Z"}), Malformed::MissingField("results") },
    end_time   = { json!({"results": {"t": 1}, "startTime": "2024-01-01T00:00:00Z"}), Malformed::MissingField("endTime") },
    start_time = { json!({"results": {"t": 1}, "endTime": "2024-01-01T00:00:10Z"}), Malformed::MissingField("startTime") },
    not_map    = { json!({"results": [1, 2], "startTime": "2024-01-01T00:00:00Z", "endTime": "2024-01-01T00:00:10Z"}), Malformed::ResultsNotMap },
    no_tasks   = { json!({"results": {}, "startTime": "2024-01-01T00:00:00Z", "endTime": "2024-01-01T00:00:10Z"}), Malformed::NoTasks },
    scalar     = { json!("oops"), Malformed::NotAnObject },
)]
fn malformed_results(value: Value, expected: Malformed) {
    assert_eq!(Submission::parse(&value), Err(expected));
}

#[test]
fn unparseable_timestamp_names_the_field() {
    let err = Submission::parse(&json!({
        "results": {"t": 1},
        "startTime": "yesterday",
        "endTime": "2024-01-01T00:00:10Z",
    }))
    .unwrap_err();
    assert!(matches!(err, Malformed::InvalidTimestamp { field: "startTime", .. }));
}

#[yare::parameterized(
    rfc3339_offset = { json!("2024-01-01T02:00:05+02:00") },
    zoneless       = { json!("2024-01-01T00:00:05.000") },
    epoch_millis   = { json!(1_704_067_205_000_i64) },
)]
fn timestamp_formats(end: Value) {
    let sub = Submission::parse(&json!({
        "results": {"t": 1},
        "startTime": "2024-01-01T00:00:00Z",
        "endTime": end,
    }))
    .unwrap();
    assert_eq!((sub.end_time - sub.start_time).num_seconds(), 5);
}

#[yare::parameterized(
    missing = { json!(null) },
    blank   = { json!("  ") },
    number  = { json!(42) },
)]
fn absent_app_version(version: Value) {
    let mut node = json!({
        "results": {"t": 1},
        "startTime": "2024-01-01T00:00:00Z",
        "endTime": "2024-01-01T00:00:10Z",
    });
    if !version.is_null() {
        node["appVersion"] = version;
    }
    assert_eq!(Submission::parse(&node).unwrap().app_version, None);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[yare::parameterized(
    plain      = { "Disaster Response", "disaster response" },
    padded     = { "  Flood  ", "flood" },
    collapsed  = { "Road \t Mapping\n2024", "road mapping 2024" },
    empty      = { "   ", "" },
)]
fn topic_keys(topic: &str, expected: &str) {
    assert_eq!(topic_key(topic), expected);
}

#[yare::parameterized(
    mixed   = { "AnaMaria", "anamaria" },
    padded  = { "  Bo ", "bo" },
    inner   = { "Ana  Maria", "ana  maria" },
)]
fn username_keys(username: &str, expected: &str) {
    assert_eq!(username_key(username), expected);
}

#[test]
fn empty_or_missing_collection_has_no_plan() {
    assert_eq!(plan(Backfill::UsernameKey, None), None);
    assert_eq!(plan(Backfill::UsernameKey, Some(&json!({}))), None);
    assert_eq!(plan(Backfill::UsernameKey, Some(&json!("scalar"))), None);
}

#[test]
fn plan_skips_records_without_string_source() {
    let users = json!({
        "u1": {"username": "Ana"},
        "u2": {"taskContributionCount": 3},
        "u3": {"username": 42},
    });
    let writes = plan(Backfill::UsernameKey, Some(&users)).unwrap();
    assert_eq!(writes, vec![Write::set(DbPath::parse("/v2/users/u1/usernameKey").unwrap(), "ana")]);
}

#[test]
fn plan_targets_project_topic_key() {
    let projects = json!({
        "p1": {"projectTopic": " Flood  Zones "},
        "p2": {"projectTopic": "Roads"},
    });
    let writes = plan(Backfill::ProjectTopicKey, Some(&projects)).unwrap();
    let summaries: Vec<String> = writes.iter().map(Write::summary).collect();
    assert_eq!(
        summaries,
        vec![
            "set /v2/projects/p1/projectTopicKey = \"flood zones\"".to_string(),
            "set /v2/projects/p2/projectTopicKey = \"roads\"".to_string(),
        ]
    );
}

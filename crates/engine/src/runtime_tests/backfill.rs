// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn empty_collections_report_empty() {
    let ctx = setup();
    let (outcome, _) = ctx.runtime.backfill(Backfill::ProjectTopicKey).await.unwrap();
    assert_eq!(outcome, BackfillOutcome::Empty);
    let (outcome, _) = ctx.runtime.backfill(Backfill::UsernameKey).await.unwrap();
    assert_eq!(outcome, BackfillOutcome::Empty);
}

#[tokio::test]
async fn username_keys_are_written() {
    let ctx = setup_with(
        json!({"v2": {"users": {
            "u1": {"username": "  AnaMaria "},
            "u2": {"username": "BO"},
            "u3": {"taskContributionCount": 4},
        }}}),
        Default::default(),
    );

    let (outcome, events) = ctx.runtime.backfill(Backfill::UsernameKey).await.unwrap();

    assert_eq!(outcome, BackfillOutcome::Updated(2));
    assert!(events.is_empty());
    assert_eq!(ctx.get("/v2/users/u1/usernameKey").await, Some(json!("anamaria")));
    assert_eq!(ctx.get("/v2/users/u2/usernameKey").await, Some(json!("bo")));
    assert_eq!(ctx.get("/v2/users/u3/usernameKey").await, None);
}

#[tokio::test]
async fn topic_keys_are_written() {
    let ctx = setup_with(
        json!({"v2": {"projects": {
            "p1": {"projectTopic": "Flood   Zones  North"},
            "p2": {"projectTopic": "roads"},
        }}}),
        Default::default(),
    );

    let (outcome, _) = ctx.runtime.backfill(Backfill::ProjectTopicKey).await.unwrap();

    assert_eq!(outcome, BackfillOutcome::Updated(2));
    assert_eq!(ctx.get("/v2/projects/p1/projectTopicKey").await, Some(json!("flood zones north")));
    assert_eq!(ctx.get("/v2/projects/p2/projectTopicKey").await, Some(json!("roads")));
}

#[tokio::test]
async fn failed_backfill_writes_nothing() {
    let tree = json!({"v2": {"users": {"u1": {"username": "Ana"}, "u2": {"username": "Bo"}}}});
    let ctx = setup_with(tree.clone(), Default::default());
    ctx.store.fail_writes(true);

    assert!(ctx.runtime.backfill(Backfill::UsernameKey).await.is_err());
    assert_eq!(ctx.store.to_value(), tree);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ExecuteError;
use tally_storage::StoreError;

#[tokio::test]
async fn store_failure_propagates_and_applies_nothing() {
    let ctx = setup();
    ctx.store.fail_writes(true);

    let event = result_created("p1", "g1", "u1", result_node(2, 10_000));
    let err = ctx.runtime.handle_event(event.clone()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Execute(ExecuteError::Store(StoreError::Unavailable(_)))));
    assert_eq!(user_counters(&ctx, "u1").await, (0, 0, 0));
    assert_eq!(ctx.get("/v2/groupsUsers").await, None);

    // Redelivery after recovery records exactly once
    ctx.store.fail_writes(false);
    let events = ctx.runtime.handle_event(event.clone()).await.unwrap();
    ctx.drain(events).await;
    ctx.runtime.handle_event(event).await.unwrap();
    assert_eq!(user_counters(&ctx, "u1").await, (2, 1, 1));
}

#[tokio::test]
async fn external_write_failure_is_a_store_error() {
    let ctx = setup();
    ctx.store.fail_writes(true);
    let err = ctx
        .runtime
        .apply_external(vec![Write::set(path("/v2/users/u1/username"), "Ana")])
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Store(StoreError::Unavailable(_))));
}

#[tokio::test]
async fn non_numeric_counter_rolls_back_the_whole_update() {
    let tree = json!({"v2": {"users": {"u1": {"groupContributionCount": "many"}}}});
    let ctx = setup_with(tree.clone(), Default::default());

    let event = result_created("p1", "g1", "u1", result_node(2, 10_000));
    let err = ctx.runtime.handle_event(event).await.unwrap_err();

    assert!(matches!(err, RuntimeError::Execute(ExecuteError::Store(StoreError::NotANumber { .. }))));
    assert_eq!(ctx.store.to_value(), tree);
}

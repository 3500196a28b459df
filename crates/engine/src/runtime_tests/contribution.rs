// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tally_core::Policy;

#[tokio::test]
async fn first_contribution_updates_every_counter() {
    let ctx = setup_with(project_tree(3), Policy::default());

    // 2 tasks in 10 seconds
    let handled = ctx.submit("p1", "g1", "u1", result_node(2, 10_000)).await;

    assert_eq!(handled, vec!["result:created", "group_users:written", "contributions:written"]);
    assert_eq!(user_counters(&ctx, "u1").await, (2, 1, 1));
    assert_eq!(ctx.count("/v2/users/u1/contributions/p1/taskContributionCount").await, 2);
    assert_eq!(ctx.get("/v2/users/u1/contributions/p1/g1").await, Some(json!(true)));
    assert_eq!(ctx.get("/v2/groupsUsers/p1/g1/u1").await, Some(json!(true)));
    assert_eq!(ctx.count("/v2/groups/p1/g1/finishedCount").await, 1);
    assert_eq!(ctx.count("/v2/groups/p1/g1/requiredCount").await, 2);
    assert!(ctx.get("/v2/results/p1/g1/u1/results").await.is_some());
}

#[tokio::test]
async fn duplicate_delivery_counts_once() {
    let ctx = setup();
    let event = result_created("p1", "g1", "u1", result_node(3, 60_000));

    let first = ctx.runtime.handle_event(event.clone()).await.unwrap();
    ctx.drain(first).await;
    let second = ctx.runtime.handle_event(event).await.unwrap();
    assert!(second.is_empty());

    assert_eq!(user_counters(&ctx, "u1").await, (3, 1, 1));
    assert_eq!(ctx.count("/v2/users/u1/contributions/p1/taskContributionCount").await, 3);
}

#[tokio::test]
async fn resubmission_after_delete_is_a_duplicate() {
    let ctx = setup();
    ctx.submit("p1", "g1", "u1", result_node(2, 10_000)).await;
    ctx.write(vec![Write::remove(path("/v2/results/p1/g1/u1"))]).await;

    let handled = ctx.submit("p1", "g1", "u1", result_node(2, 10_000)).await;
    assert_eq!(handled, vec!["result:created"]);
    assert_eq!(user_counters(&ctx, "u1").await, (2, 1, 1));
}

#[tokio::test]
async fn second_group_in_same_project() {
    let ctx = setup();
    ctx.submit("p1", "g1", "u1", result_node(2, 10_000)).await;
    ctx.submit("p1", "g2", "u1", result_node(5, 10_000)).await;
    ctx.submit("p2", "g7", "u1", result_node(1, 10_000)).await;

    assert_eq!(user_counters(&ctx, "u1").await, (8, 3, 2));
    assert_eq!(ctx.count("/v2/users/u1/contributions/p1/taskContributionCount").await, 7);
    assert_eq!(ctx.count("/v2/users/u1/contributions/p2/taskContributionCount").await, 1);
}

#[tokio::test]
async fn too_fast_result_is_deleted_without_counting() {
    let ctx = setup_with(project_tree(3), Policy::default());

    // 2 tasks in 0.1 seconds
    let handled = ctx.submit("p1", "g1", "u1", result_node(2, 100)).await;

    assert_eq!(handled, vec!["result:created"]);
    assert_eq!(ctx.get("/v2/results/p1/g1/u1").await, None);
    assert_eq!(ctx.get("/v2/users/u1").await, None);
    assert_eq!(ctx.get("/v2/groupsUsers").await, None);
    assert_eq!(ctx.get("/v2/groups").await, None);
}

#[tokio::test]
async fn result_without_results_is_left_alone() {
    let ctx = setup();
    let node = json!({"startTime": "2024-01-01T00:00:00Z", "endTime": "2024-01-01T00:00:10Z"});

    let handled = ctx.submit("p1", "g1", "u1", node.clone()).await;

    assert_eq!(handled, vec!["result:created"]);
    assert_eq!(ctx.get("/v2/results/p1/g1/u1").await, Some(node));
    assert_eq!(user_counters(&ctx, "u1").await, (0, 0, 0));
}

#[tokio::test]
async fn malformed_results_are_ignored() {
    let ctx = setup();
    let cases = [
        json!({"results": {"t1": 1}, "startTime": "2024-01-01T00:00:00Z"}),
        json!({"results": {"t1": 1}, "startTime": "yesterday", "endTime": "today"}),
        json!({"results": "t1", "startTime": "2024-01-01T00:00:00Z", "endTime": "2024-01-01T00:01:00Z"}),
        json!({"results": {}, "startTime": "2024-01-01T00:00:00Z", "endTime": "2024-01-01T00:01:00Z"}),
    ];
    for (i, node) in cases.into_iter().enumerate() {
        let event = result_created("p1", "g1", &format!("u{i}"), node);
        assert!(ctx.runtime.handle_event(event).await.unwrap().is_empty());
    }
    assert_eq!(ctx.get("/v2/users").await, None);
    assert_eq!(ctx.get("/v2/groupsUsers").await, None);
}

#[tokio::test]
async fn denylisted_user_result_is_deleted() {
    let policy = Policy { denylist: [UserId::new("vandal")].into_iter().collect(), ..Policy::default() };
    let ctx = setup_with(json!({}), policy);

    ctx.submit("p1", "g1", "vandal", result_node(2, 10_000)).await;
    ctx.submit("p1", "g1", "u1", result_node(2, 10_000)).await;

    assert_eq!(ctx.get("/v2/results/p1/g1/vandal").await, None);
    assert_eq!(user_counters(&ctx, "vandal").await, (0, 0, 0));
    assert_eq!(user_counters(&ctx, "u1").await, (2, 1, 1));
}

#[tokio::test]
async fn stale_client_on_validated_project_is_deleted() {
    let tree = json!({"v2": {"projects": {"p1": {
        "projectType": 2,
        "customOptions": {"0": {"value": 1, "title": "yes"}},
        "verificationNumber": 3,
    }}}});
    let ctx = setup_with(tree, Policy::default());

    ctx.submit("p1", "g1", "old", result_node(2, 10_000)).await;
    ctx.submit("p1", "g1", "new", result_node_with_version(2, 10_000, "2.5.0")).await;

    assert_eq!(ctx.get("/v2/results/p1/g1/old").await, None);
    assert_eq!(user_counters(&ctx, "old").await, (0, 0, 0));
    assert_eq!(user_counters(&ctx, "new").await, (2, 1, 1));
}

fn membership_tree() -> Value {
    json!({"v2": {
        "users": {
            "u1": {"userGroups": {"ug1": true, "ug2": true, "ug3": true}},
            "u2": {"userGroups": {"ug1": true}},
        },
        "userGroups": {
            "ug1": {"name": "Mappers"},
            "ug2": {"name": "Retired", "archivedAt": "2023-01-01T00:00:00Z"},
        },
        "groupsUsers": {"p1": {"g1": {"u2": true}}},
    }})
}

#[tokio::test]
async fn accepted_result_is_tagged_with_active_groups() {
    let ctx = setup_with(membership_tree(), Policy::default());
    ctx.submit("p1", "g1", "u1", result_node(2, 10_000)).await;
    assert_eq!(ctx.get("/v2/results/p1/g1/u1/userGroups").await, Some(json!({"ug1": true})));
}

#[tokio::test]
async fn duplicate_result_is_still_tagged() {
    let ctx = setup_with(membership_tree(), Policy::default());
    let handled = ctx.submit("p1", "g1", "u2", result_node(2, 10_000)).await;

    assert_eq!(handled, vec!["result:created"]);
    assert_eq!(user_counters(&ctx, "u2").await, (0, 0, 0));
    assert_eq!(ctx.get("/v2/results/p1/g1/u2/userGroups").await, Some(json!({"ug1": true})));
}

#[tokio::test]
async fn rejected_result_is_not_tagged() {
    let ctx = setup_with(membership_tree(), Policy::default());
    ctx.submit("p1", "g1", "u1", result_node(2, 10)).await;
    assert_eq!(ctx.get("/v2/results/p1/g1/u1").await, None);
}

#[tokio::test]
async fn outcome_is_reported() {
    let ctx = setup();
    let key = crate::runtime::handlers::ResultKey {
        project_id: ProjectId::new("p1"),
        group_id: GroupId::new("g1"),
        user_id: UserId::new("u1"),
    };
    let node = result_node(2, 10_000);
    let (first, _) = ctx.runtime.record_contribution(&key, &node).await.unwrap();
    let (second, _) = ctx.runtime.record_contribution(&key, &node).await.unwrap();
    assert_eq!(first, Outcome::Recorded);
    assert_eq!(second, Outcome::Duplicate);
}

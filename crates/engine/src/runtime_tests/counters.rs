// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use tally_core::Policy;

#[tokio::test]
async fn finish_count_tracks_group_users() {
    let ctx = setup_with(project_tree(5), Policy::default());

    let handled = ctx
        .write(vec![Write::set(path("/v2/groupsUsers/p1/g1"), json!({"a": true, "b": true, "c": true}))])
        .await;

    assert_eq!(handled, vec!["group_users:written"]);
    assert_eq!(ctx.count("/v2/groups/p1/g1/finishedCount").await, 3);
    assert_eq!(ctx.count("/v2/groups/p1/g1/requiredCount").await, 2);
}

#[tokio::test]
async fn group_verification_number_overrides_project() {
    let mut tree = project_tree(5);
    tree["v2"]["groups"] = json!({"p1": {"g1": {"verificationNumber": 2}}});
    let ctx = setup_with(tree, Policy::default());

    ctx.write(vec![Write::set(path("/v2/groupsUsers/p1/g1"), json!({"a": true, "b": true, "c": true}))])
        .await;

    assert_eq!(ctx.count("/v2/groups/p1/g1/finishedCount").await, 3);
    assert_eq!(ctx.count("/v2/groups/p1/g1/requiredCount").await, -1);
}

#[tokio::test]
async fn removing_group_users_resets_counts() {
    let ctx = setup_with(project_tree(5), Policy::default());
    ctx.write(vec![Write::set(path("/v2/groupsUsers/p1/g1/a"), true)]).await;
    ctx.write(vec![Write::remove(path("/v2/groupsUsers/p1/g1"))]).await;

    assert_eq!(ctx.get("/v2/groups/p1/g1/finishedCount").await, Some(json!(0)));
    assert_eq!(ctx.count("/v2/groups/p1/g1/requiredCount").await, 5);
}

#[tokio::test]
async fn missing_verification_number_writes_finished_only() {
    let ctx = setup();
    ctx.write(vec![Write::set(path("/v2/groupsUsers/p9/g1/a"), true)]).await;

    assert_eq!(ctx.count("/v2/groups/p9/g1/finishedCount").await, 1);
    assert_eq!(ctx.get("/v2/groups/p9/g1/requiredCount").await, None);
}

#[tokio::test]
async fn extreme_verification_number_keeps_counting() {
    let mut tree = project_tree(5);
    tree["v2"]["groups"] = json!({"p1": {"g1": {"verificationNumber": i64::MIN}}});
    let ctx = setup_with(tree, Policy::default());

    let handled = ctx.write(vec![Write::set(path("/v2/groupsUsers/p1/g1/a"), true)]).await;

    assert_eq!(handled, vec!["group_users:written"]);
    assert_eq!(ctx.count("/v2/groups/p1/g1/finishedCount").await, 1);
    assert_eq!(ctx.get("/v2/groups/p1/g1/requiredCount").await, None);

    // Later events are still handled normally
    ctx.write(vec![Write::set(path("/v2/groups/p1/g1/verificationNumber"), 4)]).await;
    ctx.write(vec![Write::set(path("/v2/groupsUsers/p1/g1/b"), true)]).await;
    assert_eq!(ctx.count("/v2/groups/p1/g1/requiredCount").await, 2);
}

#[tokio::test]
async fn project_count_is_recomputed_not_incremented() {
    // Drifted counter from some earlier bug
    let ctx = setup_with(
        json!({"v2": {"users": {"u1": {"projectContributionCount": 10}}}}),
        Policy::default(),
    );

    let handled = ctx
        .write(vec![Write::set(
            path("/v2/users/u1/contributions"),
            json!({"p1": {"g1": true}, "p2": {"g2": true}}),
        )])
        .await;
    assert_eq!(handled, vec!["contributions:written"]);
    assert_eq!(ctx.count("/v2/users/u1/projectContributionCount").await, 2);

    ctx.write(vec![Write::remove(path("/v2/users/u1/contributions/p1"))]).await;
    assert_eq!(ctx.count("/v2/users/u1/projectContributionCount").await, 1);

    ctx.write(vec![Write::remove(path("/v2/users/u1/contributions"))]).await;
    assert_eq!(ctx.get("/v2/users/u1/projectContributionCount").await, Some(json!(0)));
}

#[tokio::test]
async fn pipeline_over_many_users() {
    let ctx = setup_with(project_tree(3), Policy::default());
    for user in ["u1", "u2", "u3", "u4"] {
        ctx.submit("p1", "g1", user, result_node(4, 20_000)).await;
    }
    ctx.submit("p1", "g2", "u1", result_node(4, 20_000)).await;

    assert_eq!(ctx.count("/v2/groups/p1/g1/finishedCount").await, 4);
    assert_eq!(ctx.count("/v2/groups/p1/g1/requiredCount").await, -1);
    assert_eq!(ctx.count("/v2/groups/p1/g2/finishedCount").await, 1);
    assert_eq!(ctx.count("/v2/groups/p1/g2/requiredCount").await, 2);
    assert_eq!(user_counters(&ctx, "u1").await, (8, 2, 1));
    assert_eq!(user_counters(&ctx, "u4").await, (4, 1, 1));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn project_count_matches_keys(projects in prop::collection::btree_set("[a-z]{1,6}", 0..8)) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            let ctx = setup();
            let contributions: serde_json::Map<String, Value> =
                projects.iter().map(|p| (p.clone(), json!({"g1": true}))).collect();
            ctx.write(vec![Write::set(path("/v2/users/u1/contributions"), Value::Object(contributions))])
                .await;
            let expected = projects.len() as i64;
            let actual = ctx.get("/v2/users/u1/projectContributionCount").await;
            // An empty map is no write at all, so nothing fires
            if expected == 0 {
                assert_eq!(actual, None);
            } else {
                assert_eq!(actual, Some(json!(expected)));
            }
        });
    }
}

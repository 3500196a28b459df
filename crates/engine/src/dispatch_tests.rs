// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tally_core::Write;
use tally_storage::Tree;

fn path(raw: &str) -> DbPath {
    DbPath::parse(raw).unwrap()
}

fn apply(tree: &mut Tree, writes: Vec<Write>) -> Vec<Hit> {
    let changes = tree.apply(&writes).unwrap();
    Dispatcher::standard().unwrap().hits(&changes)
}

fn fired(hits: &[Hit]) -> Vec<(Trigger, String)> {
    hits.iter().map(|h| (h.trigger, h.node.to_string())).collect()
}

#[test]
fn result_write_at_node_fires_create() {
    let mut tree = Tree::new();
    let hits = apply(&mut tree, vec![Write::set(path("/v2/results/p1/g1/u1"), json!({"a": 1}))]);
    assert_eq!(fired(&hits), vec![(Trigger::ResultCreate, "/v2/results/p1/g1/u1".to_string())]);
    assert_eq!(hits[0].params.get("projectId"), Some("p1"));
    assert_eq!(hits[0].params.get("groupId"), Some("g1"));
    assert_eq!(hits[0].params.get("userId"), Some("u1"));
}

#[test]
fn deeper_writes_create_once_per_batch() {
    let mut tree = Tree::new();
    let hits = apply(
        &mut tree,
        vec![
            Write::set(path("/v2/results/p1/g1/u1/results/t1"), "a"),
            Write::set(path("/v2/results/p1/g1/u1/startTime"), "2024-01-01T00:00:00Z"),
        ],
    );
    assert_eq!(fired(&hits), vec![(Trigger::ResultCreate, "/v2/results/p1/g1/u1".to_string())]);
}

#[test]
fn update_to_existing_result_does_not_create() {
    let mut tree = Tree::new();
    apply(&mut tree, vec![Write::set(path("/v2/results/p1/g1/u1/a"), 1)]);
    let hits = apply(&mut tree, vec![Write::set(path("/v2/results/p1/g1/u1/userGroups/ug"), true)]);
    assert!(hits.is_empty());
    let hits = apply(&mut tree, vec![Write::set(path("/v2/results/p1/g1/u1"), json!({"b": 2}))]);
    assert!(hits.is_empty());
}

#[test]
fn collection_write_expands_to_each_new_node() {
    let mut tree = Tree::new();
    apply(&mut tree, vec![Write::set(path("/v2/results/p1/g1/old"), json!({"a": 1}))]);
    let hits = apply(
        &mut tree,
        vec![Write::set(
            path("/v2/results"),
            json!({
                "p1": {"g1": {"old": {"a": 1}, "new": {"a": 2}}},
                "p2": {"g9": {"u9": {"a": 3}}},
            }),
        )],
    );
    assert_eq!(
        fired(&hits),
        vec![
            (Trigger::ResultCreate, "/v2/results/p1/g1/new".to_string()),
            (Trigger::ResultCreate, "/v2/results/p2/g9/u9".to_string()),
        ]
    );
}

#[test]
fn write_triggers_fire_on_change_and_delete() {
    let mut tree = Tree::new();
    let hits = apply(&mut tree, vec![Write::set(path("/v2/groupsUsers/p1/g1/u1"), true)]);
    assert_eq!(fired(&hits), vec![(Trigger::GroupUsersWrite, "/v2/groupsUsers/p1/g1".to_string())]);

    let hits = apply(&mut tree, vec![Write::remove(path("/v2/groupsUsers/p1"))]);
    assert_eq!(fired(&hits), vec![(Trigger::GroupUsersWrite, "/v2/groupsUsers/p1/g1".to_string())]);
}

#[test]
fn unchanged_value_fires_nothing() {
    let mut tree = Tree::new();
    let hits = apply(&mut tree, vec![Write::set(path("/v2/users/u1/username"), "Ana")]);
    assert_eq!(fired(&hits), vec![(Trigger::UsernameWrite, "/v2/users/u1/username".to_string())]);
    let hits = apply(&mut tree, vec![Write::set(path("/v2/users/u1/username"), "Ana")]);
    assert!(hits.is_empty());
}

#[yare::parameterized(
    contributions   = { "/v2/users/u1/contributions/p1/g1",     Trigger::ContributionsWrite, "/v2/users/u1/contributions" },
    user_group      = { "/v2/userGroups/ug1/name",               Trigger::UserGroupWrite,     "/v2/userGroups/ug1" },
    membership_log  = { "/v2/userGroupMembershipLogs/m1/action", Trigger::MembershipLogWrite, "/v2/userGroupMembershipLogs/m1" },
)]
fn deeper_write_fires_write_trigger(raw: &str, trigger: Trigger, node: &str) {
    let mut tree = Tree::new();
    let hits = apply(&mut tree, vec![Write::set(path(raw), true)]);
    assert_eq!(fired(&hits), vec![(trigger, node.to_string())]);
}

#[test]
fn user_node_write_expands_to_nested_triggers() {
    let mut tree = Tree::new();
    let hits = apply(
        &mut tree,
        vec![Write::set(
            path("/v2/users/u1"),
            json!({"username": "Ana", "contributions": {"p1": {"g1": true}}, "taskContributionCount": 2}),
        )],
    );
    assert_eq!(
        fired(&hits),
        vec![
            (Trigger::ContributionsWrite, "/v2/users/u1/contributions".to_string()),
            (Trigger::UsernameWrite, "/v2/users/u1/username".to_string()),
        ]
    );
}

#[test]
fn unrelated_paths_fire_nothing() {
    let mut tree = Tree::new();
    let hits = apply(
        &mut tree,
        vec![
            Write::set(path("/v2/groups/p1/g1/finishedCount"), 3),
            Write::set(path("/v2/users/u1/usernameKey"), "ana"),
            Write::set(path("/v1/results/p1/g1/u1"), json!({"a": 1})),
        ],
    );
    assert!(hits.is_empty());
}

#[test]
fn empty_dispatcher_has_no_hits() {
    let mut tree = Tree::new();
    let changes = tree.apply(&[Write::set(path("/v2/results/p/g/u"), 1)]).unwrap();
    assert!(Dispatcher::new().hits(&changes).is_empty());
}

#[test]
fn bind_rejects_bad_template() {
    assert!(Dispatcher::new().bind(Trigger::UsernameWrite, "/v2/{unclosed").is_err());
}

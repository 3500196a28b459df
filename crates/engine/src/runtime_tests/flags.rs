// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn writes_raise_dirty_flags() {
    let cases = [
        ("/v2/users/u1/username", "Ana", "/v2/updates/users/u1"),
        ("/v2/userGroups/ug1/name", "Mappers", "/v2/updates/userGroups/ug1"),
        ("/v2/userGroupMembershipLogs/m1/action", "join", "/v2/updates/userGroupMembershipLogs/m1"),
    ];
    for (target, value, flag) in cases {
        let ctx = setup();
        ctx.write(vec![Write::set(path(target), value)]).await;
        assert_eq!(ctx.get(flag).await, Some(json!(true)), "{target}");
    }
}

#[tokio::test]
async fn deleting_user_group_raises_flag() {
    let ctx = setup_with(json!({"v2": {"userGroups": {"ug1": {"name": "Mappers"}}}}), Default::default());
    let handled = ctx.write(vec![Write::remove(path("/v2/userGroups/ug1"))]).await;

    assert_eq!(handled, vec!["user_group:written"]);
    assert_eq!(ctx.get("/v2/updates/userGroups/ug1").await, Some(json!(true)));
}

#[tokio::test]
async fn unchanged_username_raises_nothing() {
    let ctx = setup_with(json!({"v2": {"users": {"u1": {"username": "Ana"}}}}), Default::default());
    let handled = ctx.write(vec![Write::set(path("/v2/users/u1/username"), "Ana")]).await;

    assert!(handled.is_empty());
    assert_eq!(ctx.get("/v2/updates").await, None);
}

#[tokio::test]
async fn other_user_fields_raise_nothing() {
    let ctx = setup();
    ctx.write(vec![Write::set(path("/v2/users/u1/usernameKey"), "ana")]).await;
    assert_eq!(ctx.get("/v2/updates").await, None);
}

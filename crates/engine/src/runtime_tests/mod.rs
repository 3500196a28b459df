// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime tests

mod backfill;
mod contribution;
mod counters;
mod errors;
mod flags;

use super::*;
use crate::test_helpers::{path, setup, setup_with, TestContext};
use serde_json::{json, Value};
use tally_core::test_support::{result_node, result_node_with_version};

fn result_created(project: &str, group: &str, user: &str, result: Value) -> Event {
    Event::ResultCreated {
        project_id: ProjectId::new(project),
        group_id: GroupId::new(group),
        user_id: UserId::new(user),
        result,
    }
}

/// Tree with one project whose groups need `verification` finishes
fn project_tree(verification: i64) -> Value {
    json!({"v2": {"projects": {"p1": {"verificationNumber": verification, "projectType": 1}}}})
}

async fn user_counters(ctx: &TestContext, user: &str) -> (i64, i64, i64) {
    (
        ctx.count(&format!("/v2/users/{user}/taskContributionCount")).await,
        ctx.count(&format!("/v2/users/{user}/groupContributionCount")).await,
        ctx.count(&format!("/v2/users/{user}/projectContributionCount")).await,
    )
}

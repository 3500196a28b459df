// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use serde_json::json;

fn ids() -> (ProjectId, GroupId) {
    (ProjectId::new("p1"), GroupId::new("g1"))
}

fn writes(effects: Vec<Effect>) -> Vec<String> {
    effects.into_iter().flat_map(Effect::into_writes).map(|w| w.summary()).collect()
}

#[yare::parameterized(
    project_default = { 3, None,     Some(5), 5 },
    group_override  = { 3, Some(2),  Some(5), 2 },
    group_only      = { 0, Some(3),  None,    3 },
    over_verified   = { 7, None,     Some(5), 5 },
)]
fn required_count_uses_effective_number(
    finished: usize,
    group_verification: Option<i64>,
    project_verification: Option<i64>,
    effective: i64,
) {
    let (p, g) = ids();
    let facts = FinishFacts { finished, group_verification, project_verification };
    assert_eq!(
        writes(decide(&p, &g, &facts)),
        vec![
            format!("set /v2/groups/p1/g1/finishedCount = {finished}"),
            format!("set /v2/groups/p1/g1/requiredCount = {}", effective - finished as i64),
        ]
    );
}

#[test]
fn missing_verification_writes_finished_only() {
    let (p, g) = ids();
    let facts = FinishFacts { finished: 4, ..FinishFacts::default() };
    assert_eq!(writes(decide(&p, &g, &facts)), vec!["set /v2/groups/p1/g1/finishedCount = 4"]);
}

#[yare::parameterized(
    min       = { 1, i64::MIN },
    saturated = { 2, i64::MIN + 1 },
)]
fn out_of_range_required_count_writes_finished_only(finished: usize, verification: i64) {
    let (p, g) = ids();
    let facts =
        FinishFacts { finished, group_verification: Some(verification), ..FinishFacts::default() };
    assert_eq!(facts.required_count(), None);
    assert_eq!(
        writes(decide(&p, &g, &facts)),
        vec![format!("set /v2/groups/p1/g1/finishedCount = {finished}")]
    );
}

#[test]
fn huge_float_saturates_then_stays_in_range() {
    let facts = FinishFacts {
        finished: 3,
        project_verification: parse_verification_number(Some(&json!(-1e300))),
        ..FinishFacts::default()
    };
    assert_eq!(facts.verification_number(), Some(i64::MIN));
    assert_eq!(facts.required_count(), None);
}

#[yare::parameterized(
    integer  = { Some(json!(3)),     Some(3) },
    float    = { Some(json!(3.9)),   Some(3) },
    string   = { Some(json!(" 4 ")), Some(4) },
    garbage  = { Some(json!("x")),   None },
    map      = { Some(json!({"a": 1})), None },
    missing  = { None,               None },
)]
fn verification_number_parsing(node: Option<Value>, expected: Option<i64>) {
    assert_eq!(parse_verification_number(node.as_ref()), expected);
}

proptest! {
    #[test]
    fn counts_follow_cardinality(k in 0usize..500, v in 0i64..500, group_wins in any::<bool>()) {
        let (p, g) = ids();
        let facts = if group_wins {
            FinishFacts { finished: k, group_verification: Some(v), project_verification: Some(v + 7) }
        } else {
            FinishFacts { finished: k, group_verification: None, project_verification: Some(v) }
        };
        let expected = vec![
            format!("set /v2/groups/p1/g1/finishedCount = {k}"),
            format!("set /v2/groups/p1/g1/requiredCount = {}", v - k as i64),
        ];
        prop_assert_eq!(writes(decide(&p, &g, &facts)), expected);
    }
}

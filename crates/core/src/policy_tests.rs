// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn submission(end: &str, app_version: Option<&str>) -> Submission {
    let mut node = json!({
        "results": {"t1": "a", "t2": "b"},
        "startTime": "2024-01-01T00:00:00Z",
        "endTime": end,
    });
    if let Some(v) = app_version {
        node["appVersion"] = json!(v);
    }
    Submission::parse(&node).unwrap()
}

#[test]
fn denylisted_user_is_rejected() {
    let policy = Policy { denylist: Denylist::parse("bad-user"), ..Policy::default() };
    assert_eq!(policy.check_user(&UserId::new("bad-user")), Err(Rejection::Denylisted));
    assert_eq!(policy.check_user(&UserId::new("good-user")), Ok(()));
}

#[test]
fn fast_submission_is_rejected_with_speed() {
    let policy = Policy::default();
    let err = policy.check_speed(&submission("2024-01-01T00:00:00.100Z", None)).unwrap_err();
    match err {
        Rejection::TooFast { seconds_per_task } => assert!((seconds_per_task - 0.05).abs() < 1e-9),
        other => panic!("expected TooFast, got {other:?}"),
    }
    assert_eq!(policy.check_speed(&submission("2024-01-01T00:00:10Z", None)), Ok(()));
}

#[test]
fn threshold_is_configurable() {
    let strict = Policy { min_seconds_per_task: 10.0, ..Policy::default() };
    assert!(strict.check_speed(&submission("2024-01-01T00:00:10Z", None)).is_err());
}

#[yare::parameterized(
    validate_with_options    = { Some(2), true,  true },
    validate_without_options = { Some(2), false, false },
    other_type_with_options  = { Some(1), true,  false },
    unknown_type             = { None,    true,  false },
)]
fn stale_client_guard(project_type: Option<i64>, has_custom_options: bool, rejected: bool) {
    let policy = Policy::default();
    let info = ProjectInfo { project_type, has_custom_options };
    let result = policy.check_client(&submission("2024-01-01T00:00:10Z", None), Some(&info));
    assert_eq!(result.is_err(), rejected);
}

#[test]
fn stale_client_guard_skipped_when_app_version_present() {
    let policy = Policy::default();
    let sub = submission("2024-01-01T00:00:10Z", Some("2.4.0"));
    let info = ProjectInfo { project_type: Some(2), has_custom_options: true };
    assert!(!policy.needs_project(&sub));
    assert_eq!(policy.check_client(&sub, Some(&info)), Ok(()));
}

#[test]
fn missing_project_is_not_stale() {
    let policy = Policy::default();
    assert_eq!(policy.check_client(&submission("2024-01-01T00:00:10Z", None), None), Ok(()));
}

#[yare::parameterized(
    number_with_options = { json!({"projectType": 2, "customOptions": [{"value": 1}]}), Some(2), true },
    string_type         = { json!({"projectType": "2"}), Some(2), false },
    null_options        = { json!({"projectType": 1, "customOptions": null}), Some(1), false },
    empty               = { json!({}), None, false },
)]
fn project_info_from_node(node: Value, project_type: Option<i64>, has_custom_options: bool) {
    assert_eq!(ProjectInfo::from_node(&node), ProjectInfo { project_type, has_custom_options });
}

#[test]
fn rejection_display() {
    assert_eq!(Rejection::Denylisted.to_string(), "denylisted");
    assert_eq!(Rejection::TooFast { seconds_per_task: 0.1 }.to_string(), "too_fast");
    assert_eq!(Rejection::StaleClient { project_type: 2 }.to_string(), "stale_client");
}

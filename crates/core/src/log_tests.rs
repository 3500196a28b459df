// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    plain      = { "u1",        "k=u1" },
    spaces     = { "two words", "k=\"two words\"" },
    empty      = { "",          "k=\"\"" },
    equals     = { "a=b",       "k=\"a=b\"" },
)]
fn values_are_quoted_when_needed(value: &str, expected: &str) {
    assert_eq!(format_fields(&[("k", value.to_string())]), expected);
}

#[test]
fn context_line_appends_fields_in_order() {
    let ctx = LogContext::new(vec![("project_id", "p1".into())]).with("user_id", "u1");
    assert_eq!(ctx.line("result rejected"), "result rejected project_id=p1 user_id=u1");
}

#[test]
fn with_replaces_existing_key() {
    let ctx = LogContext::default().with("reason", "too_fast").with("reason", "denylisted");
    assert_eq!(ctx.get("reason"), Some("denylisted"));
    assert_eq!(ctx.to_string(), "reason=denylisted");
}

#[test]
fn empty_context_line_is_just_message() {
    assert_eq!(LogContext::default().line("hello"), "hello");
}

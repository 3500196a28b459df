// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parse_skips_comments_and_blank_lines() {
    let list = Denylist::parse(
        "# scripted accounts\nYq1NCbvDdGYaPzRg3zix3HkZpXm2\n\n  bot-7   # flagged 2023-03\n",
    );
    assert_eq!(list.len(), 2);
    assert!(list.contains(&UserId::new("Yq1NCbvDdGYaPzRg3zix3HkZpXm2")));
    assert!(list.contains(&UserId::new("bot-7")));
    assert!(!list.contains(&UserId::new("human")));
}

#[test]
fn extend_merges_without_duplicates() {
    let mut list: Denylist = ["a", "b"].into_iter().map(UserId::from).collect();
    list.extend(Denylist::parse("b\nc"));
    assert_eq!(list.len(), 3);
}

#[test]
fn deserializes_from_plain_list() {
    let list: Denylist = serde_json::from_str(r#"["x", "y"]"#).unwrap();
    assert!(list.contains(&UserId::new("y")));
    assert!(Denylist::new().is_empty());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger dispatch.
//!
//! A binding pairs a path template with a trigger kind. `Create` fires when
//! the node at template depth did not exist before a batch and exists after
//! it. `Write` fires whenever that node's value changed, including deletion.
//! A change above a template's depth (e.g. a whole-collection write) is
//! expanded over the before and after values to find the affected nodes.

use serde_json::Value;
use std::collections::BTreeMap;
use tally_core::template::Part;
use tally_core::{paths, Change, DbPath, Params, PathError, PathTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Create,
    Write,
}

/// Which reaction a binding feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trigger {
    ResultCreate,
    GroupUsersWrite,
    ContributionsWrite,
    UsernameWrite,
    UserGroupWrite,
    MembershipLogWrite,
}

tally_core::simple_display! {
    Trigger {
        ResultCreate => "result_create",
        GroupUsersWrite => "group_users_write",
        ContributionsWrite => "contributions_write",
        UsernameWrite => "username_write",
        UserGroupWrite => "user_group_write",
        MembershipLogWrite => "membership_log_write",
    }
}

impl Trigger {
    pub const ALL: [Trigger; 6] = [
        Trigger::ResultCreate,
        Trigger::GroupUsersWrite,
        Trigger::ContributionsWrite,
        Trigger::UsernameWrite,
        Trigger::UserGroupWrite,
        Trigger::MembershipLogWrite,
    ];

    pub fn kind(self) -> TriggerKind {
        match self {
            Trigger::ResultCreate => TriggerKind::Create,
            _ => TriggerKind::Write,
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Trigger::ResultCreate => paths::RESULT_TEMPLATE,
            Trigger::GroupUsersWrite => paths::GROUP_USERS_TEMPLATE,
            Trigger::ContributionsWrite => paths::CONTRIBUTIONS_TEMPLATE,
            Trigger::UsernameWrite => paths::USERNAME_TEMPLATE,
            Trigger::UserGroupWrite => paths::USER_GROUP_TEMPLATE,
            Trigger::MembershipLogWrite => paths::MEMBERSHIP_LOG_TEMPLATE,
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    trigger: Trigger,
    template: PathTemplate,
}

/// A binding that fired for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub trigger: Trigger,
    /// Path of the node at template depth
    pub node: DbPath,
    pub params: Params,
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    bindings: Vec<Binding>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with every trigger bound to its standard template
    pub fn standard() -> Result<Self, PathError> {
        Trigger::ALL.into_iter().try_fold(Self::new(), |d, t| d.bind(t, t.template()))
    }

    pub fn bind(mut self, trigger: Trigger, template: &str) -> Result<Self, PathError> {
        let template = PathTemplate::parse(template)?;
        self.bindings.push(Binding { trigger, template });
        Ok(self)
    }

    /// Bindings fired by one applied batch, at most one hit per node.
    ///
    /// Hits come out grouped by binding order, then by node path.
    pub fn hits(&self, changes: &[Change]) -> Vec<Hit> {
        let mut hits = Vec::new();
        for binding in &self.bindings {
            let mut fired: BTreeMap<DbPath, Params> = BTreeMap::new();
            for change in changes {
                for (node, params) in binding.fired_by(change) {
                    fired.entry(node).or_insert(params);
                }
            }
            hits.extend(
                fired.into_iter().map(|(node, params)| Hit { trigger: binding.trigger, node, params }),
            );
        }
        hits
    }
}

impl Binding {
    fn fired_by(&self, change: &Change) -> Vec<(DbPath, Params)> {
        let depth = self.template.depth();
        let path = &change.path;

        if path.len() >= depth {
            let Some(params) = self.template.matches_prefix(path) else {
                return Vec::new();
            };
            let (existed, exists) = if path.len() == depth {
                (change.before.is_some(), change.after.is_some())
            } else {
                // A deeper non-null write leaves the node in place.
                (change.existed_at(depth), change.existed_at(depth) || change.after.is_some())
            };
            let fires = match self.trigger.kind() {
                TriggerKind::Create => !existed && exists,
                TriggerKind::Write => change.is_effective(),
            };
            return if fires { vec![(path.prefix(depth), params)] } else { Vec::new() };
        }

        if !self.template.is_ancestor(path) {
            return Vec::new();
        }
        let mut nodes = Vec::new();
        expand(
            &self.template.parts()[path.len()..],
            path.clone(),
            change.before.as_ref(),
            change.after.as_ref(),
            &mut nodes,
        );
        nodes
            .into_iter()
            .filter(|(_, before, after)| match self.trigger.kind() {
                TriggerKind::Create => before.is_none() && after.is_some(),
                TriggerKind::Write => before != after,
            })
            .filter_map(|(node, _, _)| self.template.matches(&node).map(|params| (node, params)))
            .collect()
    }
}

/// Walk `parts` below `base` in both values, collecting each node reached.
fn expand<'a>(
    parts: &[Part],
    base: DbPath,
    before: Option<&'a Value>,
    after: Option<&'a Value>,
    out: &mut Vec<(DbPath, Option<&'a Value>, Option<&'a Value>)>,
) {
    let Some((part, rest)) = parts.split_first() else {
        out.push((base, before, after));
        return;
    };
    let child = |value: Option<&'a Value>, key: &str| value.and_then(|v| v.get(key));
    match part {
        Part::Literal(key) => {
            let (b, a) = (child(before, key.as_str()), child(after, key.as_str()));
            expand(rest, base.child(key), b, a, out);
        }
        Part::Param(_) => {
            let mut keys: Vec<&String> = Vec::new();
            for value in [before, after].into_iter().flatten() {
                if let Some(map) = value.as_object() {
                    keys.extend(map.keys());
                }
            }
            keys.sort();
            keys.dedup();
            for key in keys {
                let (b, a) = (child(before, key.as_str()), child(after, key.as_str()));
                expand(rest, base.child(key), b, a, out);
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;

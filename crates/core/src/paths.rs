// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locations of every entity this service reads or writes.

use crate::id::{GroupId, ProjectId, UserGroupId, UserId};
use crate::path::DbPath;

pub const ROOT: &str = "v2";

pub const RESULT_TEMPLATE: &str = "/v2/results/{projectId}/{groupId}/{userId}";
pub const GROUP_USERS_TEMPLATE: &str = "/v2/groupsUsers/{projectId}/{groupId}";
pub const CONTRIBUTIONS_TEMPLATE: &str = "/v2/users/{userId}/contributions";
pub const USERNAME_TEMPLATE: &str = "/v2/users/{userId}/username";
pub const USER_GROUP_TEMPLATE: &str = "/v2/userGroups/{userGroupId}";
pub const MEMBERSHIP_LOG_TEMPLATE: &str = "/v2/userGroupMembershipLogs/{membershipId}";

/// Namespaces under `/v2/updates` read by the external sync job
pub mod flags {
    pub const USERS: &str = "users";
    pub const USER_GROUPS: &str = "userGroups";
    pub const MEMBERSHIP_LOGS: &str = "userGroupMembershipLogs";
}

fn v2(collection: &str) -> DbPath {
    DbPath::from_segments([ROOT, collection])
}

// --- results ---

pub fn result(project: &ProjectId, group: &GroupId, user: &UserId) -> DbPath {
    v2("results").child(project).child(group).child(user)
}

pub fn result_user_groups(project: &ProjectId, group: &GroupId, user: &UserId) -> DbPath {
    result(project, group, user).child("userGroups")
}

// --- groups users ---

pub fn group_users(project: &ProjectId, group: &GroupId) -> DbPath {
    v2("groupsUsers").child(project).child(group)
}

pub fn group_user(project: &ProjectId, group: &GroupId, user: &UserId) -> DbPath {
    group_users(project, group).child(user)
}

// --- users ---

pub fn users() -> DbPath {
    v2("users")
}

pub fn user(user: &UserId) -> DbPath {
    users().child(user)
}

pub fn user_task_count(user_id: &UserId) -> DbPath {
    user(user_id).child("taskContributionCount")
}

pub fn user_group_count(user_id: &UserId) -> DbPath {
    user(user_id).child("groupContributionCount")
}

pub fn user_project_count(user_id: &UserId) -> DbPath {
    user(user_id).child("projectContributionCount")
}

pub fn user_contributions(user_id: &UserId) -> DbPath {
    user(user_id).child("contributions")
}

pub fn user_contribution_group(user_id: &UserId, project: &ProjectId, group: &GroupId) -> DbPath {
    user_contributions(user_id).child(project).child(group)
}

pub fn user_project_task_count(user_id: &UserId, project: &ProjectId) -> DbPath {
    user_contributions(user_id).child(project).child("taskContributionCount")
}

pub fn user_memberships(user_id: &UserId) -> DbPath {
    user(user_id).child("userGroups")
}

// --- groups ---

pub fn group(project: &ProjectId, group: &GroupId) -> DbPath {
    v2("groups").child(project).child(group)
}

pub fn group_verification_number(project: &ProjectId, group_id: &GroupId) -> DbPath {
    group(project, group_id).child("verificationNumber")
}

pub fn group_finished_count(project: &ProjectId, group_id: &GroupId) -> DbPath {
    group(project, group_id).child("finishedCount")
}

pub fn group_required_count(project: &ProjectId, group_id: &GroupId) -> DbPath {
    group(project, group_id).child("requiredCount")
}

// --- projects ---

pub fn projects() -> DbPath {
    v2("projects")
}

pub fn project(project: &ProjectId) -> DbPath {
    projects().child(project)
}

pub fn project_verification_number(project_id: &ProjectId) -> DbPath {
    project(project_id).child("verificationNumber")
}

// --- user groups ---

pub fn user_group(id: &UserGroupId) -> DbPath {
    v2("userGroups").child(id)
}

// --- update flags ---

pub fn update_flag(namespace: &str, id: &str) -> DbPath {
    v2("updates").child(namespace).child(id)
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;

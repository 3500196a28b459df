// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Anti-vandalism policy applied to new results

use crate::denylist::Denylist;
use crate::heuristic::{is_vandalism, mapping_speed, DEFAULT_MIN_SECONDS_PER_TASK};
use crate::id::UserId;
use crate::submission::Submission;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Project type of "validate" projects. Newer validate projects carry
/// `customOptions` that clients without an `appVersion` cannot render.
pub const DEFAULT_VALIDATE_PROJECT_TYPE: i64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub min_seconds_per_task: f64,
    pub validate_project_type: i64,
    pub denylist: Denylist,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            min_seconds_per_task: DEFAULT_MIN_SECONDS_PER_TASK,
            validate_project_type: DEFAULT_VALIDATE_PROJECT_TYPE,
            denylist: Denylist::default(),
        }
    }
}

/// Why a result was discarded
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Denylisted,
    TooFast { seconds_per_task: f64 },
    StaleClient { project_type: i64 },
}

crate::simple_display! {
    Rejection {
        Denylisted => "denylisted",
        TooFast { .. } => "too_fast",
        StaleClient { .. } => "stale_client",
    }
}

/// Project attributes the stale-client guard looks at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectInfo {
    pub project_type: Option<i64>,
    pub has_custom_options: bool,
}

impl ProjectInfo {
    pub fn from_node(project: &Value) -> Self {
        let project_type = project.get("projectType").and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        let has_custom_options =
            project.get("customOptions").is_some_and(|v| !matches!(v, Value::Null | Value::Bool(false)));
        Self { project_type, has_custom_options }
    }
}

impl Policy {
    pub fn check_user(&self, user: &UserId) -> Result<(), Rejection> {
        if self.denylist.contains(user) {
            return Err(Rejection::Denylisted);
        }
        Ok(())
    }

    pub fn check_speed(&self, submission: &Submission) -> Result<(), Rejection> {
        let speed =
            mapping_speed(submission.task_count, submission.start_time, submission.end_time);
        if is_vandalism(speed, self.min_seconds_per_task) {
            return Err(Rejection::TooFast { seconds_per_task: speed });
        }
        Ok(())
    }

    /// The client guard only needs the project when no `appVersion` was sent.
    pub fn needs_project(&self, submission: &Submission) -> bool {
        submission.app_version.is_none()
    }

    pub fn check_client(
        &self,
        submission: &Submission,
        project: Option<&ProjectInfo>,
    ) -> Result<(), Rejection> {
        if !self.needs_project(submission) {
            return Ok(());
        }
        match project {
            Some(info)
                if info.project_type == Some(self.validate_project_type)
                    && info.has_custom_options =>
            {
                Err(Rejection::StaleClient { project_type: self.validate_project_type })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;

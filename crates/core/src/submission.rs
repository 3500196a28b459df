// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing of result nodes written by the mobile client

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::num::NonZeroUsize;
use thiserror::Error;

/// Why a result node cannot be counted. Malformed results are left in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("result is not an object")]
    NotAnObject,
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("field results is not a map")]
    ResultsNotMap,
    #[error("result has no tasks")]
    NoTasks,
    #[error("field {field} has unparseable timestamp {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },
}

/// The parts of a result node the counters depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub task_count: NonZeroUsize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Non-blank client version, if the client reported one
    pub app_version: Option<String>,
}

impl Submission {
    pub fn parse(result: &Value) -> Result<Self, Malformed> {
        let node = result.as_object().ok_or(Malformed::NotAnObject)?;

        let results = node.get("results").ok_or(Malformed::MissingField("results"))?;
        let end = node.get("endTime").ok_or(Malformed::MissingField("endTime"))?;
        let start = node.get("startTime").ok_or(Malformed::MissingField("startTime"))?;

        let tasks = results.as_object().ok_or(Malformed::ResultsNotMap)?;
        let task_count = NonZeroUsize::new(tasks.len()).ok_or(Malformed::NoTasks)?;

        let app_version = node
            .get("appVersion")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Self {
            task_count,
            start_time: parse_timestamp("startTime", start)?,
            end_time: parse_timestamp("endTime", end)?,
            app_version,
        })
    }
}

/// Accept RFC 3339, a zone-less ISO timestamp (taken as UTC), or epoch
/// milliseconds.
fn parse_timestamp(field: &'static str, value: &Value) -> Result<DateTime<Utc>, Malformed> {
    let invalid = || Malformed::InvalidTimestamp { field, value: value.to_string() };
    match value {
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
                return Ok(ts.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| Utc.from_utc_datetime(&naive))
                .map_err(|_| invalid())
        }
        Value::Number(n) => {
            n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis).ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
#[path = "submission_tests.rs"]
mod tests;

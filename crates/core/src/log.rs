// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured log line formatting

/// Render `key=value` pairs separated by spaces.
///
/// Values that are empty or contain whitespace, quotes or `=` are quoted
/// so the line stays splittable.
pub fn format_fields(fields: &[(&str, String)]) -> String {
    fields.iter().map(|(k, v)| format!("{k}={}", quote(v))).collect::<Vec<_>>().join(" ")
}

fn quote(value: &str) -> String {
    let needs_quotes =
        value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"' || c == '=');
    if needs_quotes {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}

/// Key-value context bag carried through a handler invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    fields: Vec<(&'static str, String)>,
}

impl LogContext {
    pub fn new(fields: Vec<(&'static str, String)>) -> Self {
        Self { fields }
    }

    /// Add or replace a field
    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    /// `message k=v k=v`
    pub fn line(&self, message: &str) -> String {
        if self.fields.is_empty() {
            return message.to_string();
        }
        format!("{message} {self}")
    }
}

impl std::fmt::Display for LogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_fields(&self.fields))
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;

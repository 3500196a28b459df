// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dirty flags for the external sync consumer

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use serde_json::Value;
use tally_core::{paths, Effect, Event};
use tally_storage::Store;

pub(crate) fn flag(namespace: &str, id: &str) -> Effect {
    Effect::Set { path: paths::update_flag(namespace, id), value: Value::Bool(true) }
}

impl<S: Store> Runtime<S> {
    pub(crate) async fn raise_flag(
        &self,
        namespace: &str,
        id: &str,
    ) -> Result<Vec<Event>, RuntimeError> {
        self.execute(vec![flag(namespace, id)]).await
    }
}

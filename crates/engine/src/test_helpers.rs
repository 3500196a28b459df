// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::{Dispatcher, Runtime};
use serde_json::Value;
use std::collections::VecDeque;
use tally_core::{DbPath, Event, Policy, Write};
use tally_storage::{MemoryStore, Store, Tree};

pub(crate) type TestRuntime = Runtime<MemoryStore>;

pub(crate) struct TestContext {
    pub runtime: TestRuntime,
    pub store: MemoryStore,
}

pub(crate) fn path(raw: &str) -> DbPath {
    DbPath::parse(raw).unwrap()
}

/// Runtime over an empty store with the default policy
pub(crate) fn setup() -> TestContext {
    setup_with(Value::Object(Default::default()), Policy::default())
}

pub(crate) fn setup_with(tree: Value, policy: Policy) -> TestContext {
    let store = MemoryStore::from_tree(Tree::from_value(tree).unwrap());
    let runtime = Runtime::new(store.clone(), Dispatcher::standard().unwrap(), policy);
    TestContext { runtime, store }
}

impl TestContext {
    /// Apply client writes and process every cascading event until stable.
    ///
    /// Returns the names of the events handled, in order.
    pub(crate) async fn write(&self, writes: Vec<Write>) -> Vec<&'static str> {
        let events = self.runtime.apply_external(writes).await.unwrap();
        self.drain(events).await
    }

    /// Submit a result node as the client app would.
    pub(crate) async fn submit(
        &self,
        project: &str,
        group: &str,
        user: &str,
        result: Value,
    ) -> Vec<&'static str> {
        let target = path(&format!("/v2/results/{project}/{group}/{user}"));
        self.write(vec![Write::set(target, result)]).await
    }

    pub(crate) async fn drain(&self, events: Vec<Event>) -> Vec<&'static str> {
        let mut queue: VecDeque<Event> = events.into();
        let mut handled = Vec::new();
        while let Some(event) = queue.pop_front() {
            handled.push(event.name());
            queue.extend(self.runtime.handle_event(event).await.unwrap());
        }
        handled
    }

    pub(crate) async fn get(&self, raw: &str) -> Option<Value> {
        self.store.get(&path(raw)).await.unwrap()
    }

    /// Integer at `raw`, 0 when missing
    pub(crate) async fn count(&self, raw: &str) -> i64 {
        self.get(raw).await.and_then(|v| v.as_i64()).unwrap_or(0)
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::event_bus::{self, EventReader};
use axum::body::Body;
use axum::http::Request;
use tally_core::Policy;
use tally_engine::{Dispatcher, Runtime};
use tally_storage::{MemoryStore, Tree};
use tower::ServiceExt;

struct TestApp {
    app: Router,
    events: EventReader,
    store: MemoryStore,
}

fn app_with(tree: Value) -> TestApp {
    let store = MemoryStore::from_tree(Tree::from_value(tree).unwrap());
    let runtime =
        Runtime::new(store.clone(), Dispatcher::standard().unwrap(), Policy::default());
    let (bus, events) = event_bus::channel(64);
    let app = router(AppState::new(Arc::new(runtime), bus, Instant::now()));
    TestApp { app, events, store }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn json(&self, uri: &str) -> Value {
        let (status, body) = self.send("GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_str(&body).unwrap()
    }

    fn queued(&mut self) -> Vec<&'static str> {
        std::iter::from_fn(|| self.events.try_recv()).map(|e| e.name()).collect()
    }
}

#[tokio::test]
async fn missing_node_reads_as_null() {
    let t = app_with(json!({}));
    assert_eq!(t.json("/db/v2/users/nobody").await, Value::Null);
    assert_eq!(t.json("/db").await, Value::Null);
}

#[tokio::test]
async fn put_then_get() {
    let t = app_with(json!({}));
    let (status, body) =
        t.send("PUT", "/db/v2/users/u1", Some(json!({"username": "Ana", "gone": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["username"], "Ana");
    assert_eq!(t.json("/db/v2/users/u1").await, json!({"username": "Ana"}));
    assert_eq!(t.json("/db/v2/users/u1/username").await, json!("Ana"));
}

#[tokio::test]
async fn patch_applies_relative_paths() {
    let t = app_with(json!({"v2": {"projects": {"p1": {"name": "Roads", "status": "active"}}}}));
    let (status, _) = t
        .send(
            "PATCH",
            "/db/v2/projects",
            Some(json!({"p1/status": "finished", "p2/name": "Rivers", "p1/name": null})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        t.json("/db/v2/projects").await,
        json!({"p1": {"status": "finished"}, "p2": {"name": "Rivers"}})
    );
}

#[tokio::test]
async fn patch_rejects_overlapping_or_empty_keys() {
    let t = app_with(json!({"v2": {"a": 1}}));
    let (status, _) = t.send("PATCH", "/db/v2", Some(json!({"x": {"y": 1}, "x/y": 2}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = t.send("PATCH", "/db/v2", Some(json!({"/": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(t.json("/db/v2").await, json!({"a": 1}));
}

#[tokio::test]
async fn delete_prunes_node() {
    let t = app_with(json!({"v2": {"users": {"u1": {"username": "Ana"}}, "keep": true}}));
    let (status, body) = t.send("DELETE", "/db/v2/users/u1/username", None).await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "null"));
    assert_eq!(t.store.to_value(), json!({"v2": {"keep": true}}));
}

#[tokio::test]
async fn bad_requests() {
    let t = app_with(json!({}));
    let (status, body) = t.send("GET", "/db/v2/bad.key", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("invalid path"), "{body}");

    let (status, _) = t.send("PUT", "/db", Some(json!(5))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t.send("PATCH", "/db/v2", Some(json!([1, 2]))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn nested_forbidden_keys_are_rejected() {
    let mut t = app_with(json!({}));
    for body in [json!({"bad.key": true}), json!({"a/b": true}), json!({"ok": {"x$": 1}})] {
        let (status, message) = t.send("PUT", "/db/v2/groupsUsers/p1/g1", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("invalid key"), "{message}");
    }
    let (status, _) =
        t.send("PATCH", "/db/v2/groupsUsers/p1", Some(json!({"g1": {"u#1": true}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(t.store.to_value(), json!({}));
    assert!(t.queued().is_empty());
}

#[tokio::test]
async fn writes_queue_trigger_events() {
    let mut t = app_with(json!({}));
    let result = json!({
        "startTime": "2024-01-01T00:00:00Z",
        "endTime": "2024-01-01T00:10:00Z",
        "results": {"t1": 1},
    });
    let (status, _) = t.send("PUT", "/db/v2/results/p1/g1/u1", Some(result)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t.queued(), vec!["result:created"]);

    t.send("PUT", "/db/v2/users/u1/username", Some(json!("Ana"))).await;
    assert_eq!(t.queued(), vec!["username:written"]);

    // Unchanged value triggers nothing
    t.send("PUT", "/db/v2/users/u1/username", Some(json!("Ana"))).await;
    assert!(t.queued().is_empty());
}

#[tokio::test]
async fn writes_succeed_without_event_loop() {
    let TestApp { app, events, store } = app_with(json!({}));
    drop(events);
    let t = TestApp { app, events: event_bus::channel(1).1, store };
    let (status, _) = t.send("PUT", "/db/v2/userGroups/ug1/name", Some(json!("Team"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t.json("/db/v2/userGroups/ug1/name").await, json!("Team"));
}

#[tokio::test]
async fn store_outage_is_service_unavailable() {
    let t = app_with(json!({}));
    t.store.fail_writes(true);
    let (status, _) = t.send("PUT", "/db/v2/users/u1/username", Some(json!("Ana"))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn project_topic_key_backfill() {
    let t = app_with(json!({"v2": {"projects": {
        "p1": {"projectTopic": "  Flood   Mapping "},
        "p2": {"projectTopic": "Roads"},
        "p3": {"name": "no topic"},
    }}}));
    let (status, body) = t.send("GET", "/addProjectTopicKey", None).await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "Updated projectTopicKey for 2 projects"));
    assert_eq!(t.json("/db/v2/projects/p1/projectTopicKey").await, json!("flood mapping"));
    assert_eq!(t.json("/db/v2/projects/p2/projectTopicKey").await, json!("roads"));
    assert_eq!(t.json("/db/v2/projects/p3/projectTopicKey").await, Value::Null);
}

#[tokio::test]
async fn username_key_backfill() {
    let t = app_with(json!({"v2": {"users": {"u1": {"username": " Ana.B "}}}}));
    let (status, body) = t.send("GET", "/addUserNameLowercase", None).await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "Updated usernameKey for 1 users"));
    assert_eq!(t.json("/db/v2/users/u1/usernameKey").await, json!("ana.b"));
}

#[tokio::test]
async fn backfill_on_empty_collection_is_not_found() {
    let t = app_with(json!({}));
    let (status, body) = t.send("GET", "/addProjectTopicKey", None).await;
    assert_eq!((status, body.as_str()), (StatusCode::NOT_FOUND, "No projects found"));
    let (status, body) = t.send("GET", "/addUserNameLowercase", None).await;
    assert_eq!((status, body.as_str()), (StatusCode::NOT_FOUND, "No users found"));
}

#[tokio::test]
async fn backfill_failure_is_internal_error() {
    let t = app_with(json!({"v2": {"users": {"u1": {"username": "Ana"}}}}));
    t.store.fail_writes(true);
    let (status, body) = t.send("GET", "/addUserNameLowercase", None).await;
    assert_eq!((status, body.as_str()), (StatusCode::INTERNAL_SERVER_ERROR, "Some error occurred"));
    t.store.fail_writes(false);
    assert_eq!(t.json("/db/v2/users/u1/usernameKey").await, Value::Null);
}

#[tokio::test]
async fn health_reports_ok() {
    let t = app_with(json!({}));
    let health = t.json("/health").await;
    assert_eq!(health["status"], "ok");
    assert!(health["uptime_secs"].is_u64());
}

#[test]
fn update_writes_join_relative_keys() {
    let body = json!({"a/b": 1, "c": {"d": 2}});
    let writes = update_writes(&DbPath::parse("/v2").unwrap(), body.as_object().unwrap()).unwrap();
    let paths: Vec<String> = writes.iter().map(|w| w.path.to_string()).collect();
    assert_eq!(paths, vec!["/v2/a/b", "/v2/c"]);
}

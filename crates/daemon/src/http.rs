// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface: tree access for the client app, backfill endpoints and
//! a health check.
//!
//! Writes are applied before the response is sent. The trigger events they
//! cause are queued on the event bus and handled asynchronously.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tally_core::{DbPath, Event, PathError, Write};
use tally_engine::{Backfill, BackfillOutcome, RuntimeError};
use tally_storage::{Store, StoreError};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::event_bus::EventBus;
use crate::lifecycle::DaemonRuntime;

/// Shared context for all request handlers
#[derive(Clone)]
pub struct AppState {
    runtime: Arc<DaemonRuntime>,
    events: EventBus,
    start_time: Instant,
}

impl AppState {
    pub fn new(runtime: Arc<DaemonRuntime>, events: EventBus, start_time: Instant) -> Self {
        Self { runtime, events, start_time }
    }

    async fn apply(&self, writes: Vec<Write>) -> Result<(), HttpError> {
        let events = self.runtime.apply_external(writes).await?;
        self.publish(events).await;
        Ok(())
    }

    async fn publish(&self, events: Vec<Event>) {
        let count = events.len();
        if let Err(e) = self.events.publish(events).await {
            warn!(count, "dropping trigger events: {e}");
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid path: {0}")]
    Path(#[from] PathError),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

impl From<StoreError> for HttpError {
    fn from(e: StoreError) -> Self {
        HttpError::Runtime(RuntimeError::Store(e))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self {
            HttpError::Path(_) | HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Runtime(RuntimeError::Store(e)) => match e {
                StoreError::InvalidRoot
                | StoreError::InvalidKey { .. }
                | StoreError::NotANumber { .. }
                | StoreError::Overflow { .. } => StatusCode::BAD_REQUEST,
                StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            HttpError::Runtime(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, self.to_string()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/db", get(read).put(replace).patch(update).delete(remove))
        .route("/db/*path", get(read).put(replace).patch(update).delete(remove))
        .route("/addProjectTopicKey", get(add_project_topic_key))
        .route("/addUserNameLowercase", get(add_user_name_lowercase))
        .with_state(state)
}

/// `/db` addresses the root, `/db/a/b` the node `/a/b`.
fn db_path(path: Option<Path<String>>) -> Result<DbPath, HttpError> {
    match path {
        Some(Path(raw)) => Ok(DbPath::parse(&raw)?),
        None => Ok(DbPath::root()),
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

async fn read(
    State(state): State<AppState>,
    path: Option<Path<String>>,
) -> Result<Json<Value>, HttpError> {
    let path = db_path(path)?;
    let value = state.runtime.store().get(&path).await?;
    Ok(Json(value.unwrap_or(Value::Null)))
}

async fn replace(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, HttpError> {
    let path = db_path(path)?;
    state.apply(vec![Write::set(path, body.clone())]).await?;
    Ok(Json(body))
}

/// Multi-path update: each key of the body is a path relative to the
/// request path. All writes land in one atomic batch.
async fn update(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Value>, HttpError> {
    let base = db_path(path)?;
    let writes = update_writes(&base, &body)?;
    state.apply(writes).await?;
    Ok(Json(Value::Object(body)))
}

fn update_writes(base: &DbPath, body: &Map<String, Value>) -> Result<Vec<Write>, HttpError> {
    let mut targets = Vec::with_capacity(body.len());
    for key in body.keys() {
        let relative = DbPath::parse(key)?;
        if relative.is_root() {
            return Err(HttpError::BadRequest("update keys must name a child path"));
        }
        targets.push(base.join(&relative));
    }
    for (i, a) in targets.iter().enumerate() {
        if targets[i + 1..].iter().any(|b| a.starts_with(b) || b.starts_with(a)) {
            return Err(HttpError::BadRequest("update paths must not overlap"));
        }
    }
    Ok(targets.into_iter().zip(body.values()).map(|(p, v)| Write::set(p, v.clone())).collect())
}

async fn remove(
    State(state): State<AppState>,
    path: Option<Path<String>>,
) -> Result<Json<Value>, HttpError> {
    let path = db_path(path)?;
    state.apply(vec![Write::remove(path)]).await?;
    Ok(Json(Value::Null))
}

async fn add_project_topic_key(State(state): State<AppState>) -> Response {
    run_backfill(&state, Backfill::ProjectTopicKey, "projects", "projectTopicKey").await
}

async fn add_user_name_lowercase(State(state): State<AppState>) -> Response {
    run_backfill(&state, Backfill::UsernameKey, "users", "usernameKey").await
}

async fn run_backfill(
    state: &AppState,
    kind: Backfill,
    noun: &str,
    field: &str,
) -> Response {
    match state.runtime.backfill(kind).await {
        Ok((BackfillOutcome::Empty, _)) => {
            (StatusCode::NOT_FOUND, format!("No {noun} found")).into_response()
        }
        Ok((BackfillOutcome::Updated(n), events)) => {
            state.publish(events).await;
            info!(backfill = %kind, updated = n, "backfill request done");
            (StatusCode::OK, format!("Updated {field} for {n} {noun}")).into_response()
        }
        Err(e) => {
            error!(backfill = %kind, error = %e, "backfill failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Some error occurred").into_response()
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;

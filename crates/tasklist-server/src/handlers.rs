//! Route handlers for `/api/tasks`.
//!
//! Each handler validates its input before touching storage, so a malformed
//! id or body never issues a statement.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use tasklist_core::validate::{
    optional_title, parse_completed, parse_task_id, require_completed, require_title,
};
use tasklist_core::{
    to_task_collection, to_task_resource, ApiError, ApiResult, TaskInput, TaskRow,
};

use crate::dispatch::{dispatch, Reply};
use crate::server::AppState;
use crate::store::TaskStore;

const TASK_NOT_FOUND: &str = "Task not found";

// Rejection text comes from axum internals; it is logged, never sent.

fn path_id(path: Result<Path<String>, PathRejection>) -> ApiResult<i64> {
    let Path(raw) = path.map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "path rejected");
        ApiError::invalid_field("id", "Task id must be a positive integer")
    })?;
    parse_task_id(&raw)
}

fn read_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<TaskInput> {
    let Json(value) = body.map_err(|rejection| {
        debug!(
            status = rejection.status().as_u16(),
            reason = %rejection.body_text(),
            "request body rejected"
        );
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("request body is too large")
        } else {
            ApiError::invalid_field("body", "request body must be valid JSON")
        }
    })?;
    TaskInput::from_json(value)
}

async fn load(store: &TaskStore, id: i64) -> ApiResult<TaskRow> {
    store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(TASK_NOT_FOUND))
}

/// `GET /api/tasks`
pub async fn list_tasks(State(state): State<AppState>) -> Response {
    dispatch(async move {
        let rows = state.store.list().await?;
        let tasks = to_task_collection(&rows);
        let mut meta = Map::new();
        meta.insert("count".into(), json!(tasks.len()));
        Ok(Reply::ok(&tasks)?.with_meta(meta))
    })
    .await
}

/// `GET /api/tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    dispatch(async move {
        let id = path_id(path)?;
        let row = load(&state.store, id).await?;
        Reply::ok(&to_task_resource(&row))
    })
    .await
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    dispatch(async move {
        let input = read_body(body)?;
        let title = require_title(&input.title)?;
        let completed = parse_completed(&input.completed, false)?.unwrap_or(false);

        let id = state.store.insert(title, completed).await?;
        let row = state
            .store
            .get(id)
            .await?
            .ok_or_else(|| ApiError::internal(format!("task {id} missing right after insert")))?;

        info!(task_id = id, "task created");
        let resource = to_task_resource(&row);
        let location = resource.links.self_link.clone();
        Reply::created(&resource, location)
    })
    .await
}

/// `PUT /api/tasks/{id}`: both fields required, both overwritten.
pub async fn replace_task(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    dispatch(async move {
        let id = path_id(path)?;
        let input = read_body(body)?;
        let title = require_title(&input.title)?;
        let completed = require_completed(&input.completed)?;

        // Zero rows changed is the existence check.
        if state.store.update(id, title, completed).await? == 0 {
            return Err(ApiError::not_found(TASK_NOT_FOUND));
        }

        let row = load(&state.store, id).await?;
        info!(task_id = id, "task replaced");
        Reply::ok(&to_task_resource(&row))
    })
    .await
}

/// `PATCH /api/tasks/{id}`: only the supplied fields change.
pub async fn update_task(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    dispatch(async move {
        let id = path_id(path)?;
        let input = read_body(body)?;
        let title = optional_title(&input.title)?;
        let completed = parse_completed(&input.completed, false)?;
        if title.is_none() && completed.is_none() {
            return Err(ApiError::invalid(
                "at least one of title or completed must be provided",
            ));
        }

        let existing = load(&state.store, id).await?;
        let title = title.unwrap_or(existing.title);
        let completed = completed.unwrap_or(existing.completed != 0);

        if state.store.update(id, title, completed).await? == 0 {
            return Err(ApiError::not_found(TASK_NOT_FOUND));
        }

        let row = load(&state.store, id).await?;
        info!(task_id = id, "task updated");
        Reply::ok(&to_task_resource(&row))
    })
    .await
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    dispatch(async move {
        let id = path_id(path)?;
        if state.store.delete(id).await? == 0 {
            return Err(ApiError::not_found(TASK_NOT_FOUND));
        }
        info!(task_id = id, "task deleted");
        Ok(Reply::no_content())
    })
    .await
}

/// `GET /health`
pub async fn health() -> Response {
    dispatch(async { Reply::ok(&json!({"status": "ok"})) }).await
}

use super::AppState;
use super::extract::{Body, Params, Segment};
use super::views::TaskStatsView;
use crate::application::tasks::TaskQuery;
use crate::domain::task::{NewTask, TaskUpdate};
use crate::error::Result;
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Params(query): Params<TaskQuery>,
) -> Result<Json<Value>> {
    let tasks = state.tasks.list(query).await?;
    Ok(Json(json!({
        "success": true,
        "count": tasks.len(),
        "tasks": tasks,
    })))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let stats = state.tasks.stats().await?;
    Ok(Json(json!({
        "success": true,
        "stats": TaskStatsView::from(stats),
    })))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Segment(id): Segment<Uuid>,
) -> Result<Json<Value>> {
    let task = state.tasks.get(id).await?;
    Ok(Json(json!({ "success": true, "task": task })))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Body(task): Body<NewTask>,
) -> Result<(StatusCode, Json<Value>)> {
    let task = state.tasks.create(task).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "task": task })),
    ))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Segment(id): Segment<Uuid>,
    Body(update): Body<TaskUpdate>,
) -> Result<Json<Value>> {
    let task = state.tasks.update(id, update).await?;
    Ok(Json(json!({ "success": true, "task": task })))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Segment(id): Segment<Uuid>,
) -> Result<Json<Value>> {
    state.tasks.delete(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Task deleted successfully",
    })))
}

pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Segment(id): Segment<Uuid>,
) -> Result<Json<Value>> {
    let task = state.tasks.toggle(id).await?;
    Ok(Json(json!({ "success": true, "task": task })))
}

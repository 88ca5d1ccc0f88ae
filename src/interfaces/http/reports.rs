use super::AppState;
use super::auth::Auth;
use super::views::{CoordinatorView, SummaryView};
use crate::error::Result;
use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;

pub async fn me(Auth(coordinator): Auth) -> Json<Value> {
    Json(json!({
        "success": true,
        "coordinator": CoordinatorView::from(coordinator),
    }))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Auth(viewer): Auth,
) -> Result<Json<Value>> {
    let summary = state.reporting.summary(&viewer).await?;
    Ok(Json(json!({
        "success": true,
        "summary": SummaryView::from(summary),
    })))
}

use super::AppState;
use super::auth::Auth;
use super::extract::{Body, Params, Segment};
use super::views::{PaginationView, RegistrationView, registrations};
use crate::application::events::RosterQuery;
use crate::domain::event::NewEvent;
use crate::domain::payment::PaymentStatus;
use crate::error::Result;
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventParams {
    /// Only events owned by the caller.
    pub mine: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RosterParams {
    pub status: Option<PaymentStatus>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSignup {
    pub user_id: String,
    pub event_ids: Vec<Uuid>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Auth(viewer): Auth,
    Params(params): Params<EventParams>,
) -> Result<Json<Value>> {
    let events = state.events.list(&viewer, params.mine).await?;
    Ok(Json(json!({
        "success": true,
        "count": events.len(),
        "events": events,
    })))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Auth(coordinator): Auth,
    Body(event): Body<NewEvent>,
) -> Result<(StatusCode, Json<Value>)> {
    let event = state.events.create(&coordinator, event).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Event created successfully",
            "event": event,
        })),
    ))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Auth(_): Auth,
    Body(signup): Body<EventSignup>,
) -> Result<Json<Value>> {
    let registration = state
        .events
        .register_for_events(&signup.user_id, &signup.event_ids)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Successfully registered for events",
        "registration": RegistrationView::from(registration),
    })))
}

pub async fn participants(
    State(state): State<Arc<AppState>>,
    Auth(viewer): Auth,
    Segment(id): Segment<Uuid>,
    Params(params): Params<RosterParams>,
) -> Result<Json<Value>> {
    let query = RosterQuery {
        status: params.status,
        page: params.page,
        limit: params.limit,
    };
    let roster = state.events.participants(&viewer, id, query).await?;
    Ok(Json(json!({
        "success": true,
        "event": {
            "id": roster.event.id,
            "title": roster.event.title,
            "maxParticipants": roster.event.max_participants,
            "currentParticipants": roster.event.current_participants,
        },
        "registrations": registrations(roster.registrations),
        "pagination": PaginationView::from(roster.pagination),
    })))
}

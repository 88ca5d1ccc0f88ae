use super::AppState;
use super::auth::{Admin, Auth};
use super::extract::{Body, Params, Segment};
use super::views::{PaginationView, RegistrationView, registrations};
use crate::application::registry::RegistrationQuery;
use crate::domain::payment::PaymentStatus;
use crate::domain::registration::{NewRegistration, ParticipationType, RegistrationUpdate, UserType};
use crate::error::Result;
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    pub status: Option<PaymentStatus>,
    pub user_type: Option<UserType>,
    pub participation_type: Option<ParticipationType>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl From<ListParams> for RegistrationQuery {
    fn from(p: ListParams) -> Self {
        Self {
            status: p.status,
            user_type: p.user_type,
            participation_type: p.participation_type,
            search: p.search,
            page: p.page,
            limit: p.limit,
        }
    }
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Auth(_): Auth,
    Params(params): Params<ListParams>,
) -> Result<Json<Value>> {
    let (page, pagination) = state.registry.list(params.into()).await?;
    Ok(Json(json!({
        "success": true,
        "registrations": registrations(page),
        "pagination": PaginationView::from(pagination),
    })))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Auth(by): Auth,
    Body(signup): Body<NewRegistration>,
) -> Result<(StatusCode, Json<Value>)> {
    let registration = state.registry.register(signup).await?;
    info!(register_id = %registration.register_id, coordinator = %by.id, "Registration created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration successful",
            "registration": RegistrationView::from(registration),
        })),
    ))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Auth(_): Auth,
    Segment(id): Segment<String>,
) -> Result<Json<Value>> {
    let registration = state.registry.find(&id).await?;
    Ok(Json(json!({
        "success": true,
        "registration": RegistrationView::from(registration),
    })))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Auth(_): Auth,
    Segment(id): Segment<String>,
    Body(update): Body<RegistrationUpdate>,
) -> Result<Json<Value>> {
    let registration = state.registry.update(&id, update).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Registration updated successfully",
        "registration": RegistrationView::from(registration),
    })))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Admin(_): Admin,
    Segment(id): Segment<String>,
) -> Result<Json<Value>> {
    let removed = state.registry.delete(&id).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Registration {removed} deleted"),
    })))
}

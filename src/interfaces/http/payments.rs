use super::AppState;
use super::auth::Auth;
use super::extract::{Body, Params, Segment, optional_json};
use super::views::{PaginationView, RegistrationView, StatisticsView, registrations};
use crate::application::registry::{MarkPaidRequest, PaymentRequest};
use crate::application::reporting::MyPaymentsQuery;
use crate::domain::money::Amount;
use crate::domain::payment::{PaymentAmendment, PaymentMethod, PaymentStatus};
use crate::domain::registration::Registration;
use crate::error::Result;
use axum::{Json, body::Bytes, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ProcessBody {
    pub amount: Amount,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    #[serde(alias = "transactionId")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MarkPaidBody {
    pub amount: Option<Amount>,
    pub method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AmendBody {
    pub status: Option<PaymentStatus>,
    #[serde(alias = "amount")]
    pub paid: Option<Amount>,
    pub method: Option<PaymentMethod>,
    pub notes: Option<String>,
    #[serde(alias = "transactionId")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UnpaidParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MineParams {
    pub status: Option<PaymentStatus>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

fn outcome(message: String, registration: Registration) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "registration": RegistrationView::from(registration),
    }))
}

pub async fn unpaid(
    State(state): State<Arc<AppState>>,
    Auth(_): Auth,
    Params(params): Params<UnpaidParams>,
) -> Result<Json<Value>> {
    let outstanding = state.registry.unpaid(params.limit).await?;
    Ok(Json(json!({
        "success": true,
        "count": outstanding.len(),
        "registrations": registrations(outstanding),
    })))
}

pub async fn mine(
    State(state): State<Arc<AppState>>,
    Auth(coordinator): Auth,
    Params(params): Params<MineParams>,
) -> Result<Json<Value>> {
    let query = MyPaymentsQuery {
        status: params.status,
        search: params.search,
        page: params.page,
        limit: params.limit,
    };
    let mine = state.reporting.my_payments(&coordinator, query).await?;
    Ok(Json(json!({
        "success": true,
        "payments": registrations(mine.payments),
        "pagination": PaginationView::from(mine.pagination),
        "statistics": StatisticsView::from(mine.statistics),
    })))
}

pub async fn process(
    State(state): State<Arc<AppState>>,
    Auth(by): Auth,
    Segment(id): Segment<String>,
    Body(body): Body<ProcessBody>,
) -> Result<Json<Value>> {
    let amount = body.amount;
    let request = PaymentRequest {
        amount,
        method: body.method,
        notes: body.notes,
        transaction_id: body.transaction_id,
    };
    let registration = state.registry.process_payment(&id, &by, request).await?;
    Ok(outcome(
        format!("Payment of ₹{amount} processed successfully"),
        registration,
    ))
}

pub async fn mark_paid(
    State(state): State<Arc<AppState>>,
    Auth(by): Auth,
    Segment(id): Segment<String>,
    body: Bytes,
) -> Result<Json<Value>> {
    let body: MarkPaidBody = optional_json(&body)?;
    let request = MarkPaidRequest {
        amount: body.amount,
        method: body.method,
        notes: body.notes,
    };
    let registration = state.registry.mark_paid(&id, &by, request).await?;
    Ok(outcome("Marked as paid successfully".into(), registration))
}

pub async fn amend(
    State(state): State<Arc<AppState>>,
    Auth(by): Auth,
    Segment(id): Segment<String>,
    Body(body): Body<AmendBody>,
) -> Result<Json<Value>> {
    let amendment = PaymentAmendment {
        status: body.status,
        paid: body.paid,
        method: body.method,
        notes: body.notes,
        transaction_id: body.transaction_id,
    };
    let registration = state.registry.amend_payment(&id, &by, amendment).await?;
    Ok(outcome("Payment details updated successfully".into(), registration))
}

pub async fn reset(
    State(state): State<Arc<AppState>>,
    Auth(by): Auth,
    Segment(id): Segment<String>,
) -> Result<Json<Value>> {
    let registration = state.registry.reset_payment(&id, &by).await?;
    Ok(outcome("Payment status reset successfully".into(), registration))
}

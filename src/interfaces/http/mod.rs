//! REST surface of the registration desk.
//!
//! Task routes are open; everything under registrations, payments, reports
//! and events needs a coordinator bearer token. Errors are rendered as
//! `{"success": false, "message": ...}` with a matching status code.

pub mod auth;
pub mod error;
pub mod events;
pub mod extract;
pub mod payments;
pub mod registrations;
pub mod reports;
pub mod tasks;
pub mod views;

use crate::application::events::EventService;
use crate::application::registry::RegistrationService;
use crate::application::reporting::ReportingService;
use crate::application::tasks::TaskService;
use crate::domain::fee::FeeSchedule;
use crate::domain::ports::CoordinatorStoreBox;
use crate::error::{RegistryError, Result};
use crate::infrastructure::Stores;
use axum::{
    Json, Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
    },
    routing::{get, patch, post, put},
};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub struct AppState {
    pub registry: Arc<RegistrationService>,
    pub reporting: ReportingService,
    pub events: EventService,
    pub tasks: TaskService,
    pub coordinators: CoordinatorStoreBox,
}

impl AppState {
    pub fn new(stores: Stores, fees: FeeSchedule) -> Arc<Self> {
        let registry = Arc::new(RegistrationService::new(stores.registrations, fees));
        Arc::new(Self {
            reporting: ReportingService::new(registry.clone()),
            events: EventService::new(stores.events, registry.clone()),
            tasks: TaskService::new(stores.tasks),
            coordinators: stores.coordinators,
            registry,
        })
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}

fn cors(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| RegistryError::ConfigError(format!("bad CORS origin {origin}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60)))
}

pub fn router(state: Arc<AppState>, cors_origins: &[String]) -> Result<Router> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/stats", get(tasks::stats))
        .route(
            "/api/tasks/{id}",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route("/api/tasks/{id}/toggle", patch(tasks::toggle))
        .route("/api/me", get(reports::me))
        .route(
            "/api/registrations",
            get(registrations::list).post(registrations::create),
        )
        .route(
            "/api/registrations/{id}",
            get(registrations::get)
                .put(registrations::update)
                .delete(registrations::delete),
        )
        .route("/api/payments/unpaid", get(payments::unpaid))
        .route("/api/payments/mine", get(payments::mine))
        .route("/api/payments/{id}/process", post(payments::process))
        .route("/api/payments/{id}/mark-paid", post(payments::mark_paid))
        .route("/api/payments/{id}", put(payments::amend).delete(payments::reset))
        .route("/api/reports/summary", get(reports::summary))
        .route("/api/events", get(events::list).post(events::create))
        .route("/api/events/register", post(events::register))
        .route("/api/events/{id}/registrations", get(events::participants))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors(cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    Ok(router)
}

pub async fn serve(router: Router, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(address = %bind, "Server running");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

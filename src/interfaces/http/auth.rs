use super::AppState;
use crate::domain::coordinator::Coordinator;
use crate::error::RegistryError;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::debug;

/// The coordinator behind a valid `Authorization: Bearer <token>` header.
pub struct Auth(pub Coordinator);

fn bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<Arc<AppState>> for Auth {
    type Rejection = RegistryError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer(parts)
            .ok_or_else(|| RegistryError::Unauthorized("No token provided".into()))?;

        match state.coordinators.find_by_token(token).await? {
            Some(coordinator) if coordinator.active => Ok(Self(coordinator)),
            Some(coordinator) => {
                debug!(coordinator = %coordinator.id, "Rejected inactive coordinator");
                Err(RegistryError::Unauthorized("Account is deactivated".into()))
            }
            None => Err(RegistryError::Unauthorized("Invalid token".into())),
        }
    }
}

/// Like [`Auth`], but only admits admins.
pub struct Admin(pub Coordinator);

impl FromRequestParts<Arc<AppState>> for Admin {
    type Rejection = RegistryError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Auth(coordinator) = Auth::from_request_parts(parts, state).await?;
        if !coordinator.is_admin() {
            return Err(RegistryError::Forbidden("Admin access required".into()));
        }
        Ok(Self(coordinator))
    }
}

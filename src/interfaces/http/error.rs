use crate::error::RegistryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

impl RegistryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::ValidationError(_) | RegistryError::CsvError(_) => StatusCode::BAD_REQUEST,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::Conflict(_) => StatusCode::CONFLICT,
            RegistryError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RegistryError::Forbidden(_) => StatusCode::FORBIDDEN,
            RegistryError::IoError(_)
            | RegistryError::ConfigError(_)
            | RegistryError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            RegistryError::ValidationError(msg)
            | RegistryError::Conflict(msg)
            | RegistryError::Unauthorized(msg)
            | RegistryError::Forbidden(msg) => msg,
            RegistryError::NotFound(_) | RegistryError::CsvError(_) => self.to_string(),
            other => {
                error!(error = %other, "Request failed");
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

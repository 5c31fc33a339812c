use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::waitlist::{SignupImportError, WaitlistError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("waitlist error: {0}")]
    Waitlist(#[from] WaitlistError),
    #[error("import error: {0}")]
    Import(#[from] SignupImportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Waitlist(WaitlistError::DuplicateEmail) => StatusCode::CONFLICT,
            AppError::Waitlist(WaitlistError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Import(SignupImportError::Csv(_) | SignupImportError::MissingColumn(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Waitlist(_)
            | AppError::Import(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}

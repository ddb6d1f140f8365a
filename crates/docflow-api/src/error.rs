//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; `AppError`
//! values convert via `?` and render as a consistent JSON body with the
//! right status code and log level.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docflow_core::{AppError, LogLevel};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse is external, AppError lives in docflow-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) | AppError::DuplicateId(_) => StatusCode::CONFLICT,
        AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error = %error, code, "Request failed"),
        LogLevel::Warn => tracing::warn!(error = %error, code, "Request failed"),
        LogLevel::Error => tracing::error!(error = %error, code, "Request failed"),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        log_error(&self.0);
        let status = status_code(&self.0);
        let body = ErrorResponse {
            error: self.0.to_string(),
            code: self.0.error_code().to_string(),
            recoverable: self.0.is_recoverable(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_code(&AppError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_code(&AppError::Conflict("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_code(&AppError::DuplicateId("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_code(&AppError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_code(&AppError::Unauthorized("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_code(&AppError::store("io", anyhow::anyhow!("io"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

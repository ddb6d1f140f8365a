//! Shared-token authentication middleware.
//!
//! Document routes require the configured token in the `x-api-token`
//! header. When no token is configured, auth is disabled (local runs).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use docflow_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

pub const API_TOKEN_HEADER: &str = "x-api-token";

pub async fn require_api_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, HttpAppError> {
    if let Some(expected) = state.config.api_token() {
        let provided = request
            .headers()
            .get(API_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected) {
            return Err(AppError::Unauthorized(format!(
                "missing or invalid {} header",
                API_TOKEN_HEADER
            ))
            .into());
        }
    }
    Ok(next.run(request).await)
}

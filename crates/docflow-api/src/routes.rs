//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::get,
    Json, Router,
};
use docflow_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_api_token;
use crate::handlers::{documents, events};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let document_routes = Router::new()
        .route(
            "/api/documents",
            get(documents::list_documents).post(documents::upload_document),
        )
        .route("/api/documents/events", get(events::document_events))
        .route(
            "/api/documents/{id}",
            get(documents::get_document)
                .patch(documents::patch_document)
                .delete(documents::delete_document),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_api_token,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(document_routes)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

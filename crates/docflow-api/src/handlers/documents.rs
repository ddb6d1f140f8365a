//! Document lifecycle handlers.
//!
//! Thin wrappers over the coordinator: parse the request, call the
//! operation, publish the committed record to the broadcaster on success.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use docflow_core::keys::blob_key;
use docflow_core::models::{
    Document, DocumentDescriptor, DocumentPage, StatusChange, StatusFilter,
};
use docflow_core::AppError;
use docflow_services::LifecycleCoordinator;
use serde::Deserialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Document>, HttpAppError> {
    let mut uploaded = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::InvalidInput("file field has no filename".to_string()))?;
            let mimetype = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("failed to read upload: {}", e)))?;
            uploaded = Some((file_name, mimetype, data));
        }
    }
    let (file_name, mimetype, data) =
        uploaded.ok_or_else(|| AppError::InvalidInput("no file uploaded".to_string()))?;
    let size = data.len() as i64;

    // The blob key depends on the id, so the id is allocated up front and
    // the payload stored before the metadata record is written.
    let document_id = LifecycleCoordinator::allocate_id();
    let key = blob_key(&document_id, &file_name);
    state.blobs.put(&key, data, &mimetype).await.map_err(AppError::from)?;

    let descriptor = DocumentDescriptor {
        file_name,
        size,
        mimetype,
    };
    let document = state
        .documents
        .create_document(descriptor, document_id)
        .await?;
    state.broadcaster.publish(document.clone());
    Ok(Json(document))
}

pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Document>, HttpAppError> {
    let document = state.documents.fetch_document(&id).await?;
    Ok(Json(document))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    status: Option<String>,
    token: Option<String>,
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DocumentPage>, HttpAppError> {
    let filter: StatusFilter = query
        .status
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(AppError::InvalidInput)?;
    let page = state
        .documents
        .fetch_all_documents(filter, query.token.as_deref())
        .await?;
    Ok(Json(page))
}

#[tracing::instrument(skip(state))]
pub async fn patch_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(change): Json<StatusChange>,
) -> Result<Json<Document>, HttpAppError> {
    let document = state.documents.update_document(&id, change).await?;
    state.broadcaster.publish(document.clone());
    Ok(Json(document))
}

#[tracing::instrument(skip(state))]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Document>, HttpAppError> {
    let document = state.documents.delete_document(&id).await?;
    state.broadcaster.publish(document.clone());
    Ok(Json(document))
}

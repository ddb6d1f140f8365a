use async_trait::async_trait;
use docflow_core::models::{Document, DocumentPage, DocumentStatus, StatusFilter};
use docflow_core::AppError;

/// Partial field write applied by `DocumentStore::update`.
///
/// `deleted_at` and `purge_at` are set-exactly-once: backends keep the
/// existing value when one is already present, so a retried delete
/// finalization cannot move a purge deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentUpdate {
    pub status: Option<DocumentStatus>,
    pub deleted_at: Option<i64>,
    pub purge_at: Option<i64>,
}

impl DocumentUpdate {
    pub fn status(status: DocumentStatus) -> Self {
        DocumentUpdate {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Metadata store contract demanded by the lifecycle coordinator.
///
/// Listing order is stable for a fixed filter (`created_at`, then
/// `document_id`); the continuation token is opaque to callers and passed
/// back unmodified for the next page.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new record. Fails with `DuplicateId` when the id exists.
    async fn insert(&self, document: &Document) -> Result<(), AppError>;

    /// Fetch a record by id.
    async fn get(&self, document_id: &str) -> Result<Option<Document>, AppError>;

    /// Apply a partial update and return the updated record.
    /// Fails with `NotFound` when the id is absent.
    async fn update(&self, document_id: &str, update: DocumentUpdate) -> Result<Document, AppError>;

    /// Return one page of records matching the filter.
    async fn list(
        &self,
        filter: StatusFilter,
        token: Option<&str>,
        limit: i64,
    ) -> Result<DocumentPage, AppError>;
}

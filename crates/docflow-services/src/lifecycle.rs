//! Lifecycle coordinator.
//!
//! Sequences blob-store and metadata-store operations per document and owns
//! every `status` transition. For a single document the blob side effect is
//! always performed before the metadata write that advances `status`, so a
//! crash between the two leaves the document in its prior status with the
//! blob operation already applied; the metadata write is the commit point
//! and a caller re-reading the document may safely retry the transition.

use std::sync::Arc;

use chrono::Utc;
use docflow_core::constants::PURGE_RETENTION_SECS;
use docflow_core::keys::{blob_key, retained_blob_key};
use docflow_core::models::{
    Document, DocumentDescriptor, DocumentPage, DocumentStatus, StatusChange, StatusFilter,
};
use docflow_core::AppError;
use docflow_db::{DocumentStore, DocumentUpdate};
use docflow_storage::{BlobError, BlobStore};
use uuid::Uuid;

/// Tag attached to a blob when its document enters the `deleting` state.
const DELETION_TAG: (&str, &str) = ("deletion", "pending");

pub struct LifecycleCoordinator {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    page_size: i64,
}

impl LifecycleCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>, page_size: i64) -> Self {
        Self {
            store,
            blobs,
            page_size,
        }
    }

    /// Allocate a fresh document id. The caller uploads the blob under the
    /// derived key before calling `create_document`, since the key depends
    /// on the id.
    pub fn allocate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Write a new document record with `status = pending`.
    ///
    /// The blob itself must already be stored under
    /// `blob_key(document_id, descriptor.file_name)` by the caller.
    pub async fn create_document(
        &self,
        descriptor: DocumentDescriptor,
        document_id: String,
    ) -> Result<Document, AppError> {
        let document = Document {
            document_id,
            file_name: descriptor.file_name,
            size: descriptor.size,
            mimetype: descriptor.mimetype,
            status: DocumentStatus::Pending,
            created_at: Utc::now(),
            deleted_at: None,
            purge_at: None,
        };
        self.store.insert(&document).await?;
        tracing::info!(
            document_id = %document.document_id,
            file_name = %document.file_name,
            size = document.size,
            "Document created"
        );
        Ok(document)
    }

    /// Fetch a single record, failing with `NotFound` for unknown ids.
    pub async fn fetch_document(&self, document_id: &str) -> Result<Document, AppError> {
        self.store
            .get(document_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", document_id)))
    }

    /// Return one page of records filtered by status. The continuation
    /// token is passed through to the metadata store unmodified.
    pub async fn fetch_all_documents(
        &self,
        filter: StatusFilter,
        token: Option<&str>,
    ) -> Result<DocumentPage, AppError> {
        self.store.list(filter, token, self.page_size).await
    }

    /// Generic status write.
    ///
    /// A target status of `deleted` is intercepted unconditionally and
    /// routed through delete finalization; every other target is written
    /// as-is (callers own the semantics of their transitions).
    pub async fn update_document(
        &self,
        document_id: &str,
        change: StatusChange,
    ) -> Result<Document, AppError> {
        if change.status == DocumentStatus::Deleted {
            return self.finalize_delete(document_id).await;
        }

        let document = self
            .store
            .update(document_id, DocumentUpdate::status(change.status))
            .await?;
        tracing::info!(
            document_id = %document.document_id,
            status = %document.status,
            "Document status updated"
        );
        Ok(document)
    }

    /// Request soft deletion: tag the blob as pending deletion, then
    /// transition the record to `deleting`.
    ///
    /// `deleting` is an acknowledgment, not completion; the actual blob
    /// retention move happens when the document is transitioned to
    /// `deleted`. Deletion is rejected with `Conflict` while the document
    /// is `running`.
    pub async fn delete_document(&self, document_id: &str) -> Result<Document, AppError> {
        let current = self.fetch_document(document_id).await?;
        if current.status == DocumentStatus::Running {
            tracing::warn!(document_id = %document_id, "Delete rejected while running");
            return Err(AppError::Conflict(format!(
                "Document {} is running and cannot be deleted",
                document_id
            )));
        }

        let key = blob_key(&current.document_id, &current.file_name);
        // Blob side effect before the metadata commit
        self.blobs.tag(&key, &[DELETION_TAG]).await?;

        let document = self
            .store
            .update(document_id, DocumentUpdate::status(DocumentStatus::Deleting))
            .await?;
        tracing::info!(document_id = %document_id, key = %key, "Document delete requested");
        Ok(document)
    }

    /// Finalize a soft delete: retain the blob under the `deleted/` prefix,
    /// remove the live blob, then stamp `deleted_at` and `purge_at`.
    ///
    /// Copy and delete tolerate an absent source key so a retry of a
    /// partially applied finalization converges instead of failing.
    async fn finalize_delete(&self, document_id: &str) -> Result<Document, AppError> {
        let current = self.fetch_document(document_id).await?;
        let key = blob_key(&current.document_id, &current.file_name);
        let retained = retained_blob_key(&current.document_id, &current.file_name);

        match self.blobs.copy(&key, &retained).await {
            Ok(()) => {}
            Err(BlobError::NotFound(_)) => {
                tracing::debug!(
                    document_id = %document_id,
                    key = %key,
                    "Blob already moved; treating copy as applied"
                );
            }
            Err(e) => return Err(e.into()),
        }

        match self.blobs.delete(&key).await {
            Ok(()) => {}
            Err(BlobError::NotFound(_)) => {
                tracing::debug!(
                    document_id = %document_id,
                    key = %key,
                    "Blob already removed; treating delete as applied"
                );
            }
            Err(e) => return Err(e.into()),
        }

        // An earlier partially applied finalization keeps its stamps.
        let deleted_at = current
            .deleted_at
            .unwrap_or_else(|| Utc::now().timestamp());
        let purge_at = current
            .purge_at
            .unwrap_or(deleted_at + PURGE_RETENTION_SECS);

        let document = self
            .store
            .update(
                document_id,
                DocumentUpdate {
                    status: Some(DocumentStatus::Deleted),
                    deleted_at: Some(deleted_at),
                    purge_at: Some(purge_at),
                },
            )
            .await?;
        tracing::info!(
            document_id = %document_id,
            retained_key = %retained,
            purge_at,
            "Document soft-deleted"
        );
        Ok(document)
    }
}

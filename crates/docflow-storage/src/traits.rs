//! Blob store abstraction trait.

use async_trait::async_trait;
use bytes::Bytes;
use docflow_core::AppError;
use thiserror::Error;

/// Blob operation errors
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Put failed: {0}")]
    PutFailed(String),

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("Tag failed: {0}")]
    TagFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for blob operations
pub type BlobResult<T> = Result<T, BlobError>;

impl From<BlobError> for AppError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::NotFound(key) => AppError::NotFound(format!("Blob {} not found", key)),
            other => AppError::store("blob store operation failed", other),
        }
    }
}

/// Blob store abstraction.
///
/// `copy` and `tag` report an absent source key as `BlobError::NotFound`;
/// `delete` may either do the same or succeed, backend permitting. Callers
/// that retry a delete transition map `NotFound` to success (the object was
/// already moved or removed).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob under the given key, overwriting any existing object.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> BlobResult<()>;

    /// Copy the blob at `from_key` to `to_key`.
    async fn copy(&self, from_key: &str, to_key: &str) -> BlobResult<()>;

    /// Attach key/value tags to an existing blob, replacing its tag set.
    async fn tag(&self, key: &str, tags: &[(&str, &str)]) -> BlobResult<()>;

    /// Delete the blob at `key`.
    async fn delete(&self, key: &str) -> BlobResult<()>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &str) -> BlobResult<bool>;
}

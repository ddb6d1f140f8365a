//! Docflow blob storage
//!
//! Blob store abstraction and implementations. Keys are derived by
//! `docflow_core::keys::blob_key` and are stable for a document's lifetime;
//! soft-deleted blobs are retained under the `deleted/` prefix using the
//! same key.

pub mod factory;
pub mod memory;
pub mod s3;
pub mod traits;

pub use factory::create_blob_store;
pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;
pub use traits::{BlobError, BlobResult, BlobStore};

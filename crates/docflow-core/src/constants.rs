//! Shared constants.

/// Retention window for soft-deleted blobs, in seconds (90 days).
/// `purge_at` is always `deleted_at + PURGE_RETENTION_SECS`.
pub const PURGE_RETENTION_SECS: i64 = 90 * 86_400;

/// Prefix under which soft-deleted blobs are retained until their purge deadline.
pub const DELETED_BLOB_PREFIX: &str = "deleted/";

/// Default page size for document listing.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Default maximum upload size in bytes (50 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Default interval between subscriber keep-alive pushes, in seconds.
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 15;

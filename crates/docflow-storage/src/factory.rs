use std::sync::Arc;

use docflow_core::{BlobBackend, Config};

use crate::{BlobError, BlobResult, BlobStore, MemoryBlobStore, S3BlobStore};

/// Create a blob store backend based on configuration
pub async fn create_blob_store(config: &Config) -> BlobResult<Arc<dyn BlobStore>> {
    match config.blob_backend() {
        BlobBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| BlobError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from);
            let endpoint = config.s3_endpoint().map(String::from);

            let store = S3BlobStore::new(bucket, region, endpoint).await?;
            Ok(Arc::new(store))
        }
        BlobBackend::Memory => Ok(Arc::new(MemoryBlobStore::new())),
    }
}

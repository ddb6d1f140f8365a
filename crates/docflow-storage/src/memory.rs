//! In-memory blob store for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::traits::{BlobError, BlobResult, BlobStore};

#[derive(Debug, Clone)]
struct StoredBlob {
    data: Bytes,
    content_type: String,
    tags: HashMap<String, String>,
}

/// Blob store backed by an in-memory map. Mirrors the S3 backend's contract,
/// including `NotFound` for copy/tag against absent keys.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a blob exists (for test assertions).
    pub fn has_object(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// Stored bytes of a blob (for test assertions).
    pub fn object_data(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).map(|b| b.data.clone())
    }

    /// Tags attached to a blob (for test assertions).
    pub fn tags_for(&self, key: &str) -> Option<HashMap<String, String>> {
        self.objects.lock().unwrap().get(key).map(|b| b.tags.clone())
    }

    /// Stored content type of a blob (for test assertions).
    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|b| b.content_type.clone())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> BlobResult<()> {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
                tags: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn copy(&self, from_key: &str, to_key: &str) -> BlobResult<()> {
        let mut objects = self.objects.lock().unwrap();
        let source = objects
            .get(from_key)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(from_key.to_string()))?;
        objects.insert(to_key.to_string(), source);
        Ok(())
    }

    async fn tag(&self, key: &str, tags: &[(&str, &str)]) -> BlobResult<()> {
        let mut objects = self.objects.lock().unwrap();
        let blob = objects
            .get_mut(key)
            .ok_or_else(|| BlobError::NotFound(key.to_string()))?;
        blob.tags = tags
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Ok(())
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> BlobResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_copy_delete() {
        let store = MemoryBlobStore::new();
        store
            .put("d1.pdf", Bytes::from_static(b"content"), "application/pdf")
            .await
            .unwrap();
        assert!(store.exists("d1.pdf").await.unwrap());

        store.copy("d1.pdf", "deleted/d1.pdf").await.unwrap();
        assert!(store.has_object("deleted/d1.pdf"));
        assert_eq!(
            store.object_data("deleted/d1.pdf"),
            Some(Bytes::from_static(b"content"))
        );
        assert_eq!(
            store.content_type_of("deleted/d1.pdf").as_deref(),
            Some("application/pdf")
        );

        store.delete("d1.pdf").await.unwrap();
        assert!(!store.exists("d1.pdf").await.unwrap());
        // Retained copy untouched
        assert!(store.has_object("deleted/d1.pdf"));
    }

    #[tokio::test]
    async fn test_absent_keys_report_not_found() {
        let store = MemoryBlobStore::new();
        assert!(matches!(
            store.copy("missing", "dest").await,
            Err(BlobError::NotFound(_))
        ));
        assert!(matches!(
            store.tag("missing", &[("deletion", "pending")]).await,
            Err(BlobError::NotFound(_))
        ));
        assert!(matches!(
            store.delete("missing").await,
            Err(BlobError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_tag_replaces_tag_set() {
        let store = MemoryBlobStore::new();
        store
            .put("d1", Bytes::from_static(b"x"), "application/octet-stream")
            .await
            .unwrap();
        store.tag("d1", &[("deletion", "pending")]).await.unwrap();
        let tags = store.tags_for("d1").unwrap();
        assert_eq!(tags.get("deletion").map(String::as_str), Some("pending"));
    }
}

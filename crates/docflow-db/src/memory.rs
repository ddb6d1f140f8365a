//! In-memory metadata store for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use docflow_core::models::{Document, DocumentPage, StatusFilter};
use docflow_core::AppError;

use crate::store::{DocumentStore, DocumentUpdate};
use crate::token::{decode_offset, encode_offset};

/// Metadata store backed by a mutex-guarded map. Matches the Postgres
/// backend's semantics, including set-once `deleted_at`/`purge_at` and
/// stable listing order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<String, Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, document: &Document) -> Result<(), AppError> {
        let mut documents = self.documents.lock().unwrap();
        if documents.contains_key(&document.document_id) {
            return Err(AppError::DuplicateId(document.document_id.clone()));
        }
        documents.insert(document.document_id.clone(), document.clone());
        Ok(())
    }

    async fn get(&self, document_id: &str) -> Result<Option<Document>, AppError> {
        Ok(self.documents.lock().unwrap().get(document_id).cloned())
    }

    async fn update(
        &self,
        document_id: &str,
        update: DocumentUpdate,
    ) -> Result<Document, AppError> {
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .get_mut(document_id)
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", document_id)))?;
        if let Some(status) = update.status {
            document.status = status;
        }
        if document.deleted_at.is_none() {
            document.deleted_at = update.deleted_at;
        }
        if document.purge_at.is_none() {
            document.purge_at = update.purge_at;
        }
        Ok(document.clone())
    }

    async fn list(
        &self,
        filter: StatusFilter,
        token: Option<&str>,
        limit: i64,
    ) -> Result<DocumentPage, AppError> {
        let offset = match token {
            Some(token) => decode_offset(token)?,
            None => 0,
        };

        let documents = self.documents.lock().unwrap();
        let mut matching: Vec<Document> = documents
            .values()
            .filter(|d| filter.matches(d.status))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            (a.created_at, &a.document_id).cmp(&(b.created_at, &b.document_id))
        });

        let offset = offset as usize;
        let limit = limit as usize;
        let page: Vec<Document> = matching.iter().skip(offset).take(limit).cloned().collect();
        let next_token = if offset + page.len() < matching.len() {
            Some(encode_offset((offset + limit) as i64))
        } else {
            None
        };

        Ok(DocumentPage {
            documents: page,
            next_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use docflow_core::models::DocumentStatus;

    fn test_document(id: &str, status: DocumentStatus, age_secs: i64) -> Document {
        Document {
            document_id: id.to_string(),
            file_name: format!("{}.pdf", id),
            size: 50,
            mimetype: "application/pdf".to_string(),
            status,
            created_at: Utc::now() - Duration::seconds(age_secs),
            deleted_at: None,
            purge_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = MemoryDocumentStore::new();
        let document = test_document("d1", DocumentStatus::Pending, 0);
        store.insert(&document).await.unwrap();
        assert!(matches!(
            store.insert(&document).await,
            Err(AppError::DuplicateId(_))
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = MemoryDocumentStore::new();
        let result = store
            .update("d404", DocumentUpdate::status(DocumentStatus::Running))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_stamps_are_set_once() {
        let store = MemoryDocumentStore::new();
        store
            .insert(&test_document("d1", DocumentStatus::Deleting, 0))
            .await
            .unwrap();

        let first = store
            .update(
                "d1",
                DocumentUpdate {
                    status: Some(DocumentStatus::Deleted),
                    deleted_at: Some(1_000),
                    purge_at: Some(1_000 + 7_776_000),
                },
            )
            .await
            .unwrap();
        assert_eq!(first.deleted_at, Some(1_000));

        // A later write cannot move the stamps
        let second = store
            .update(
                "d1",
                DocumentUpdate {
                    status: Some(DocumentStatus::Deleted),
                    deleted_at: Some(2_000),
                    purge_at: Some(2_000 + 7_776_000),
                },
            )
            .await
            .unwrap();
        assert_eq!(second.deleted_at, Some(1_000));
        assert_eq!(second.purge_at, Some(1_000 + 7_776_000));
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let store = MemoryDocumentStore::new();
        for i in 0..5 {
            store
                .insert(&test_document(
                    &format!("d{}", i),
                    DocumentStatus::Pending,
                    100 - i,
                ))
                .await
                .unwrap();
        }
        store
            .insert(&test_document("r1", DocumentStatus::Running, 200))
            .await
            .unwrap();

        let first = store
            .list(StatusFilter::Only(DocumentStatus::Pending), None, 2)
            .await
            .unwrap();
        assert_eq!(first.documents.len(), 2);
        assert_eq!(first.documents[0].document_id, "d0");
        let token = first.next_token.expect("more pages expected");

        let second = store
            .list(
                StatusFilter::Only(DocumentStatus::Pending),
                Some(&token),
                2,
            )
            .await
            .unwrap();
        assert_eq!(second.documents.len(), 2);
        assert_eq!(second.documents[0].document_id, "d2");

        let all = store.list(StatusFilter::All, None, 10).await.unwrap();
        assert_eq!(all.documents.len(), 6);
        assert!(all.next_token.is_none());
    }
}

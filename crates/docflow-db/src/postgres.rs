//! Postgres-backed metadata store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docflow_core::models::{Document, DocumentPage, DocumentStatus, StatusFilter};
use docflow_core::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::store::{DocumentStore, DocumentUpdate};
use crate::token::{decode_offset, encode_offset};

const COLUMNS: &str =
    "document_id, file_name, size, mimetype, status, created_at, deleted_at, purge_at";

#[derive(sqlx::FromRow)]
struct DocumentRow {
    document_id: String,
    file_name: String,
    size: i64,
    mimetype: String,
    status: String,
    created_at: DateTime<Utc>,
    deleted_at: Option<i64>,
    purge_at: Option<i64>,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, AppError> {
        let status: DocumentStatus = self
            .status
            .parse()
            .map_err(|e: String| AppError::store("corrupt status column", anyhow::anyhow!(e)))?;
        Ok(Document {
            document_id: self.document_id,
            file_name: self.file_name,
            size: self.size,
            mimetype: self.mimetype,
            status,
            created_at: self.created_at,
            deleted_at: self.deleted_at,
            purge_at: self.purge_at,
        })
    }
}

fn db_error(context: &str, err: sqlx::Error) -> AppError {
    AppError::store(context.to_string(), err)
}

/// Metadata store backed by Postgres.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database and run pending migrations.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout_secs: u64,
    ) -> Result<Self, AppError> {
        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await
            .map_err(|e| db_error("failed to connect to database", e))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::store("failed to run database migrations", e))?;
        tracing::info!(max_connections, "Database connected and migrations applied");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, document: &Document) -> Result<(), AppError> {
        let result = sqlx::query(
            "INSERT INTO documents \
             (document_id, file_name, size, mimetype, status, created_at, deleted_at, purge_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&document.document_id)
        .bind(&document.file_name)
        .bind(document.size)
        .bind(&document.mimetype)
        .bind(document.status.to_string())
        .bind(document.created_at)
        .bind(document.deleted_at)
        .bind(document.purge_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let is_duplicate = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if is_duplicate {
                    Err(AppError::DuplicateId(document.document_id.clone()))
                } else {
                    Err(db_error("failed to insert document", e))
                }
            }
        }
    }

    async fn get(&self, document_id: &str) -> Result<Option<Document>, AppError> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM documents WHERE document_id = $1",
            COLUMNS
        ))
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("failed to fetch document", e))?;

        row.map(DocumentRow::into_document).transpose()
    }

    async fn update(
        &self,
        document_id: &str,
        update: DocumentUpdate,
    ) -> Result<Document, AppError> {
        // deleted_at/purge_at are set exactly once: an existing stamp wins
        // over whatever a retried update carries.
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "UPDATE documents SET \
               status = COALESCE($2, status), \
               deleted_at = COALESCE(deleted_at, $3), \
               purge_at = COALESCE(purge_at, $4) \
             WHERE document_id = $1 \
             RETURNING {}",
            COLUMNS
        ))
        .bind(document_id)
        .bind(update.status.map(|s| s.to_string()))
        .bind(update.deleted_at)
        .bind(update.purge_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("failed to update document", e))?;

        match row {
            Some(row) => row.into_document(),
            None => Err(AppError::NotFound(format!(
                "Document {} not found",
                document_id
            ))),
        }
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

        // Fetch one extra row to detect whether more results exist.
        let rows: Vec<DocumentRow> = match filter {
            StatusFilter::All => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM documents \
                     ORDER BY created_at, document_id LIMIT $1 OFFSET $2",
                    COLUMNS
                ))
                .bind(limit + 1)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            StatusFilter::Only(status) => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM documents WHERE status = $1 \
                     ORDER BY created_at, document_id LIMIT $2 OFFSET $3",
                    COLUMNS
                ))
                .bind(status.to_string())
                .bind(limit + 1)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| db_error("failed to list documents", e))?;

        let has_more = rows.len() as i64 > limit;
        let documents = rows
            .into_iter()
            .take(limit as usize)
            .map(DocumentRow::into_document)
            .collect::<Result<Vec<_>, _>>()?;
        let next_token = has_more.then(|| encode_offset(offset + limit));

        Ok(DocumentPage {
            documents,
            next_token,
        })
    }
}

//! Application state and wiring.
//!
//! The coordinator and broadcaster are constructed once at startup and
//! shared by reference; the broadcaster in particular is never ambient
//! global state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use docflow_core::{Config, MetadataBackend};
use docflow_db::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use docflow_services::{ChangeBroadcaster, LifecycleCoordinator};
use docflow_storage::{create_blob_store, BlobStore};

pub struct AppState {
    pub config: Config,
    pub documents: Arc<LifecycleCoordinator>,
    pub blobs: Arc<dyn BlobStore>,
    pub broadcaster: Arc<ChangeBroadcaster>,
}

pub async fn build_state(config: &Config) -> Result<Arc<AppState>> {
    let blobs = create_blob_store(config).await?;

    let store: Arc<dyn DocumentStore> = match config.metadata_backend() {
        MetadataBackend::Postgres => {
            let database_url = config
                .database_url()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL not configured"))?;
            Arc::new(
                PgDocumentStore::connect(
                    database_url,
                    config.db_max_connections(),
                    config.db_timeout_seconds(),
                )
                .await?,
            )
        }
        MetadataBackend::Memory => {
            tracing::warn!("Using in-memory metadata store; records will not survive restart");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let documents = Arc::new(LifecycleCoordinator::new(
        store,
        blobs.clone(),
        config.page_size(),
    ));

    let broadcaster = Arc::new(ChangeBroadcaster::new());
    // Keep-alive task runs for the process lifetime
    let _heartbeat = broadcaster.start_heartbeat(Duration::from_secs(
        config.heartbeat_interval_secs(),
    ));

    Ok(Arc::new(AppState {
        config: config.clone(),
        documents,
        blobs,
        broadcaster,
    }))
}

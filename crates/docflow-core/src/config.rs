//! Configuration module
//!
//! Environment-driven configuration for the API binary and services:
//! server port, metadata/blob backend selection, S3 settings, and limits.

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::constants::{
    DEFAULT_HEARTBEAT_INTERVAL_SECS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PAGE_SIZE,
};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;

/// Metadata store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataBackend {
    Postgres,
    Memory,
}

impl FromStr for MetadataBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(MetadataBackend::Postgres),
            "memory" => Ok(MetadataBackend::Memory),
            other => Err(format!("unknown metadata backend: {}", other)),
        }
    }
}

/// Blob store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobBackend {
    S3,
    Memory,
}

impl FromStr for BlobBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(BlobBackend::S3),
            "memory" => Ok(BlobBackend::Memory),
            other => Err(format!("unknown blob backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    server_port: u16,
    metadata_backend: MetadataBackend,
    database_url: Option<String>,
    db_max_connections: u32,
    db_timeout_seconds: u64,
    blob_backend: BlobBackend,
    s3_bucket: Option<String>,
    s3_region: Option<String>,
    s3_endpoint: Option<String>,
    api_token: Option<String>,
    page_size: i64,
    max_upload_bytes: usize,
    heartbeat_interval_secs: u64,
}

impl Config {
    /// Load configuration from the environment (a `.env` file is honored
    /// when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server_port: parse_env("PORT", DEFAULT_PORT)?,
            metadata_backend: parse_env("METADATA_BACKEND", MetadataBackend::Postgres)?,
            database_url: env::var("DATABASE_URL").ok(),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            db_timeout_seconds: parse_env("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS)?,
            blob_backend: parse_env("BLOB_BACKEND", BlobBackend::S3)?,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok().or_else(|| env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            api_token: env::var("INGESTION_API_TOKEN").ok(),
            page_size: parse_env("PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            heartbeat_interval_secs: parse_env(
                "HEARTBEAT_INTERVAL_SECS",
                DEFAULT_HEARTBEAT_INTERVAL_SECS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.metadata_backend == MetadataBackend::Postgres && self.database_url.is_none() {
            bail!("DATABASE_URL is required when METADATA_BACKEND=postgres");
        }
        if self.blob_backend == BlobBackend::S3 && self.s3_bucket.is_none() {
            bail!("S3_BUCKET is required when BLOB_BACKEND=s3");
        }
        if self.page_size <= 0 {
            bail!("PAGE_SIZE must be positive");
        }
        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn metadata_backend(&self) -> MetadataBackend {
        self.metadata_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn blob_backend(&self) -> BlobBackend {
        self.blob_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    /// Shared token required in the `x-api-token` header. `None` disables auth.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn heartbeat_interval_secs(&self) -> u64 {
        self.heartbeat_interval_secs
    }

    /// Configuration for tests and local tooling: in-memory backends, no auth.
    pub fn for_tests() -> Self {
        Config {
            server_port: 0,
            metadata_backend: MetadataBackend::Memory,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            db_timeout_seconds: DEFAULT_DB_TIMEOUT_SECS,
            blob_backend: BlobBackend::Memory,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            api_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
        }
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", name, e))
            .with_context(|| format!("failed to parse environment variable {}", name)),
        Err(_) => Ok(default),
    }
}

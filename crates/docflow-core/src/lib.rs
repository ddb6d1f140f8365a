//! Docflow core library
//!
//! Shared domain types for the document lifecycle service: the `Document`
//! record and its status state machine, the error taxonomy, blob key
//! derivation, and environment-driven configuration.

pub mod config;
pub mod constants;
pub mod error;
pub mod keys;
pub mod models;

pub use config::{BlobBackend, Config, MetadataBackend};
pub use error::{AppError, LogLevel};

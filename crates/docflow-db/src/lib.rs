//! Docflow metadata store
//!
//! Durable key-value record store for document metadata, keyed by document
//! id with a secondary access path by status. The Postgres backend is the
//! production store; the in-memory backend serves tests and local runs.

pub mod memory;
pub mod postgres;
pub mod store;
pub(crate) mod token;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use store::{DocumentStore, DocumentUpdate};

//! Docflow services
//!
//! The two core components of the document lifecycle service: the
//! `LifecycleCoordinator`, which sequences blob-store and metadata-store
//! operations per document and owns the status state machine, and the
//! `ChangeBroadcaster`, which fans committed lifecycle events out to every
//! live subscriber.

pub mod broadcast;
pub mod lifecycle;

pub use broadcast::{ChangeBroadcaster, Subscription};
pub use lifecycle::LifecycleCoordinator;

pub mod document;
pub mod event;

pub use document::{
    Document, DocumentDescriptor, DocumentPage, DocumentStatus, StatusChange, StatusFilter,
};
pub use event::ChangeEvent;

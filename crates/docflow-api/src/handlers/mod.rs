pub mod documents;
pub mod events;

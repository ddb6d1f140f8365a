use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Document;

/// Event pushed to every live subscriber of the change broadcaster.
///
/// Carries a committed document record, or a periodic keep-alive that lets
/// half-open connections be detected and keeps intermediary proxies from
/// timing the connection out.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    Document { document: Document },
    Heartbeat { at: DateTime<Utc> },
}

impl ChangeEvent {
    pub fn document(document: Document) -> Self {
        ChangeEvent::Document { document }
    }

    pub fn heartbeat() -> Self {
        ChangeEvent::Heartbeat { at: Utc::now() }
    }

    /// Event name used on the wire (SSE event field).
    pub fn name(&self) -> &'static str {
        match self {
            ChangeEvent::Document { .. } => "document",
            ChangeEvent::Heartbeat { .. } => "heartbeat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentStatus;

    #[test]
    fn test_event_tagging() {
        let document = Document {
            document_id: "d1".to_string(),
            file_name: "lion.pdf".to_string(),
            size: 50,
            mimetype: "application/pdf".to_string(),
            status: DocumentStatus::Deleting,
            created_at: Utc::now(),
            deleted_at: None,
            purge_at: None,
        };
        let event = ChangeEvent::document(document);
        assert_eq!(event.name(), "document");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "document");
        assert_eq!(json["document"]["document_id"], "d1");

        let beat = ChangeEvent::heartbeat();
        assert_eq!(beat.name(), "heartbeat");
        let json = serde_json::to_value(&beat).unwrap();
        assert_eq!(json["type"], "heartbeat");
    }
}

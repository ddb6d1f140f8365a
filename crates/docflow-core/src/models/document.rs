use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document lifecycle status.
///
/// Status transitions are owned exclusively by the lifecycle coordinator;
/// no other component writes `status`, `deleted_at`, or `purge_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Running,
    Finished,
    Failed,
    Deleting,
    Deleted,
    DeleteFailed,
}

impl Display for DocumentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DocumentStatus::Pending => write!(f, "pending"),
            DocumentStatus::Running => write!(f, "running"),
            DocumentStatus::Finished => write!(f, "finished"),
            DocumentStatus::Failed => write!(f, "failed"),
            DocumentStatus::Deleting => write!(f, "deleting"),
            DocumentStatus::Deleted => write!(f, "deleted"),
            DocumentStatus::DeleteFailed => write!(f, "delete_failed"),
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DocumentStatus::Pending),
            "running" => Ok(DocumentStatus::Running),
            "finished" => Ok(DocumentStatus::Finished),
            "failed" => Ok(DocumentStatus::Failed),
            "deleting" => Ok(DocumentStatus::Deleting),
            "deleted" => Ok(DocumentStatus::Deleted),
            "delete_failed" => Ok(DocumentStatus::DeleteFailed),
            other => Err(format!("unknown document status: {}", other)),
        }
    }
}

/// The document record tracked per uploaded file.
///
/// `deleted_at` and `purge_at` are Unix-epoch-seconds timestamps. Both are
/// absent until the document reaches `deleted` and immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub document_id: String,
    pub file_name: String,
    pub size: i64,
    pub mimetype: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purge_at: Option<i64>,
}

/// Descriptive metadata supplied at upload. Set once at creation, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub file_name: String,
    pub size: i64,
    pub mimetype: String,
}

/// Requested status transition for an existing document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: DocumentStatus,
}

/// Listing filter: either every document or a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(DocumentStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: DocumentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse::<DocumentStatus>().map(StatusFilter::Only)
        }
    }
}

/// One page of a document listing plus an opaque continuation token when
/// more results exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_round_trips() {
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::Running,
            DocumentStatus::Finished,
            DocumentStatus::Failed,
            DocumentStatus::Deleting,
            DocumentStatus::Deleted,
            DocumentStatus::DeleteFailed,
        ] {
            assert_eq!(status.to_string().parse::<DocumentStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        assert!("purged".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::DeleteFailed).unwrap();
        assert_eq!(json, "\"delete_failed\"");
        let back: DocumentStatus = serde_json::from_str("\"deleting\"").unwrap();
        assert_eq!(back, DocumentStatus::Deleting);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "pending".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(DocumentStatus::Pending))
        );
        assert!("everything".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_filter_matches() {
        assert!(StatusFilter::All.matches(DocumentStatus::Running));
        assert!(StatusFilter::Only(DocumentStatus::Deleted).matches(DocumentStatus::Deleted));
        assert!(!StatusFilter::Only(DocumentStatus::Deleted).matches(DocumentStatus::Pending));
    }

    #[test]
    fn test_document_serializes_without_unset_delete_fields() {
        let document = Document {
            document_id: "d1".to_string(),
            file_name: "lion.pdf".to_string(),
            size: 50,
            mimetype: "application/pdf".to_string(),
            status: DocumentStatus::Pending,
            created_at: Utc::now(),
            deleted_at: None,
            purge_at: None,
        };
        let json = serde_json::to_value(&document).unwrap();
        assert!(json.get("deleted_at").is_none());
        assert!(json.get("purge_at").is_none());
        assert_eq!(json["status"], "pending");
    }
}

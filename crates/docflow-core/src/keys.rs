//! Blob key derivation.
//!
//! The blob-store key for a document is a pure function of its id and the
//! original file name's extension. Key derivation is centralized here so the
//! create, update, and delete paths can never disagree on a document's key.

use std::path::Path;

use crate::constants::DELETED_BLOB_PREFIX;

/// Derive the blob-store key for a document.
///
/// `{document_id}.{ext}` when the original file name carries an extension,
/// bare `{document_id}` otherwise. Stable for the document's lifetime.
pub fn blob_key(document_id: &str, file_name: &str) -> String {
    match Path::new(file_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{}.{}", document_id, ext),
        None => document_id.to_string(),
    }
}

/// Key under which a soft-deleted document's blob is retained until purge.
pub fn retained_blob_key(document_id: &str, file_name: &str) -> String {
    format!("{}{}", DELETED_BLOB_PREFIX, blob_key(document_id, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_key_uses_file_extension() {
        assert_eq!(blob_key("d1", "lion.pdf"), "d1.pdf");
        assert_eq!(blob_key("d1", "report.final.docx"), "d1.docx");
    }

    #[test]
    fn test_blob_key_without_extension() {
        assert_eq!(blob_key("d1", "README"), "d1");
        // Hidden files have no extension
        assert_eq!(blob_key("d1", ".env"), "d1");
    }

    #[test]
    fn test_blob_key_is_deterministic() {
        let a = blob_key("18903458904", "Lion.pdf");
        let b = blob_key("18903458904", "Lion.pdf");
        assert_eq!(a, b);
    }

    #[test]
    fn test_retained_key_shares_base_key() {
        assert_eq!(retained_blob_key("d1", "lion.pdf"), "deleted/d1.pdf");
        assert_eq!(retained_blob_key("d1", "README"), "deleted/d1");
    }
}

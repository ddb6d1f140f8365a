//! Error types module
//!
//! All failures surfaced by the lifecycle coordinator and the surrounding
//! layers are unified under the `AppError` enum. The coordinator performs no
//! silent recovery: store failures are classified into this taxonomy when
//! recognizable and returned to the caller untouched otherwise.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like lookups of unknown ids
    Debug,
    /// Warning level - for rejected requests (conflicts, bad input)
    Warn,
    /// Error level - for unexpected store failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Duplicate document id: {0}")]
    DuplicateId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Store failure: {message}")]
    Store {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Wrap an underlying MetadataStore/BlobStore I/O failure, keeping the cause attached.
    pub fn store(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::Store {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Machine-readable error code (e.g. "NOT_FOUND") for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::DuplicateId(_) => "DUPLICATE_ID",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Store { .. } => "STORE_FAILURE",
        }
    }

    /// Whether a caller may retry the failed operation without a state change first.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Store { .. })
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::NotFound(_) => LogLevel::Debug,
            AppError::Conflict(_)
            | AppError::DuplicateId(_)
            | AppError::InvalidInput(_)
            | AppError::Unauthorized(_) => LogLevel::Warn,
            AppError::Store { .. } => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound("x".into()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Conflict("x".into()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::DuplicateId("x".into()).error_code(),
            "DUPLICATE_ID"
        );
        let store = AppError::store("db down", anyhow::anyhow!("connection refused"));
        assert_eq!(store.error_code(), "STORE_FAILURE");
    }

    #[test]
    fn test_only_store_failures_are_recoverable() {
        assert!(AppError::store("io", anyhow::anyhow!("io")).is_recoverable());
        assert!(!AppError::NotFound("x".into()).is_recoverable());
        assert!(!AppError::Conflict("x".into()).is_recoverable());
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(AppError::NotFound("x".into()).log_level(), LogLevel::Debug);
        assert_eq!(AppError::Conflict("x".into()).log_level(), LogLevel::Warn);
        assert_eq!(
            AppError::store("io", anyhow::anyhow!("io")).log_level(),
            LogLevel::Error
        );
    }
}

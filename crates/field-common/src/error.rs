//! Error types for metadata access and field queries.

use thiserror::Error;

/// Result type alias using MetadataError.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Primary error type for metadata and collection operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    // === Lookup Errors ===
    #[error("key not found: {key}{}", reason_suffix(.reason))]
    KeyNotFound {
        key: String,
        /// Why a computed key could not be resolved, if it was one.
        reason: Option<String>,
    },

    #[error("computation failed: {0}")]
    Computation(String),

    #[error("invalid metadata value: {0}")]
    InvalidValue(String),

    // === Caller Errors ===
    #[error("{0}")]
    Usage(String),

    // === Configuration Errors ===
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(", reason={}", r),
        None => String::new(),
    }
}

impl MetadataError {
    /// Shorthand for a plain missing key.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        MetadataError::KeyNotFound {
            key: key.into(),
            reason: None,
        }
    }

    pub fn is_key_not_found(&self) -> bool {
        matches!(self, MetadataError::KeyNotFound { .. })
    }

    /// Usage errors indicate a caller programming error rather than a data issue.
    pub fn is_usage(&self) -> bool {
        matches!(self, MetadataError::Usage(_))
    }
}

impl From<crate::time::TimeParseError> for MetadataError {
    fn from(err: crate::time::TimeParseError) -> Self {
        MetadataError::Computation(err.to_string())
    }
}

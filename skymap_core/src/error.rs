//! Error types for persistence and configuration.
//!
//! Domain operations on the stores never fail; only loading, saving and
//! migrating snapshots and reading configuration return these.

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error at '{path}': {message}")]
    Serialization { path: String, message: String },

    #[error("Unsupported snapshot version {found} for '{key}' (latest known is {latest})")]
    UnsupportedVersion { key: String, found: u32, latest: u32 },

    #[error("Checksum mismatch for '{key}': expected {expected}, found {actual}")]
    ChecksumMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Snapshot key mismatch: expected '{expected}', found '{found}'")]
    KeyMismatch { expected: String, found: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization {
            path: ".".to_string(),
            message: e.to_string(),
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for StoreError {
    fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        StoreError::Serialization {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        }
    }
}

//! # Error Handling
//!
//! Error types for KaguraDB operations. Every error carries enough context
//! (the key, the path, the offending length) for the transport layer to act
//! on it without re-deriving state; the core itself never retries.

use thiserror::Error;

/// Result type alias for KaguraDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type for KaguraDB
#[derive(Error, Debug)]
pub enum Error {
    #[error("key {key:?} does not exist")]
    KeyNotFound { key: String },

    #[error("embedding failed: {message}")]
    Embedding { message: String },

    #[error("storage I/O error: {message}")]
    Io {
        message: String,
        source: std::io::Error,
    },

    #[error("malformed entry: {message}")]
    MalformedEntry { message: String },

    #[error("invalid metric {name:?}: expected one of cosine, dot, l2")]
    InvalidMetric { name: String },

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Get error code for monitoring
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::KeyNotFound { .. } => "KEY_NOT_FOUND",
            Error::Embedding { .. } => "EMBEDDING_UNAVAILABLE",
            Error::Io { .. } => "STORAGE_IO",
            Error::MalformedEntry { .. } => "MALFORMED_ENTRY",
            Error::InvalidMetric { .. } => "INVALID_METRIC",
            Error::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Error::Configuration { .. } => "CONFIG_ERROR",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

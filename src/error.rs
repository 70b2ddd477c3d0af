//! Error types for the clipboard history store.

use thiserror::Error;

/// Main error type for store and capture operations.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Store is locked by another process")]
    Locked,

    #[error("Invalid store format: {0}")]
    InvalidFormat(String),

    #[error("Clipboard read failed: {0}")]
    Clipboard(String),
}

impl From<serde_json::Error> for ClipError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            ClipError::Serialization(e.to_string())
        } else if e.is_data() || e.is_syntax() || e.is_eof() {
            ClipError::Deserialization(e.to_string())
        } else {
            ClipError::Serialization(e.to_string())
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, ClipError>;

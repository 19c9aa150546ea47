//! Error types for local store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for local store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during local store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Records could not be serialized for writing.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The collection file exists but cannot be decoded.
    #[error("store corrupted at {path}: {message}")]
    Corrupted {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Description of the decoding failure.
        message: String,
    },
}

impl StorageError {
    /// Creates an I/O error from a message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(io::Error::other(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupted_display_names_path() {
        let err = StorageError::Corrupted {
            path: PathBuf::from("/tmp/posts.json"),
            message: "expected value".into(),
        };
        let text = err.to_string();
        assert!(text.contains("/tmp/posts.json"));
        assert!(text.contains("expected value"));
    }

    #[test]
    fn io_helper_wraps_message() {
        let err = StorageError::io("disk full");
        assert!(matches!(err, StorageError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: disk full");
    }
}

//! Error types for the remote source.

use thiserror::Error;

/// Result type for remote fetches.
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors that can occur while fetching from the remote API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Connection or transport failure.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the request can be retried.
        retryable: bool,
    },

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Timeout.
    #[error("request timed out")]
    Timeout,

    /// The configured base URL or an endpoint is invalid.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Not connected.
    #[error("not connected to server")]
    NotConnected,
}

impl NetworkError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::Transport { retryable, .. } => *retryable,
            NetworkError::Timeout => true,
            NetworkError::Status { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_builder() {
            NetworkError::transport_fatal(err.to_string())
        } else if err.is_decode() {
            NetworkError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            NetworkError::Status {
                status: status.as_u16(),
            }
        } else {
            NetworkError::transport_retryable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(NetworkError::transport_retryable("connection reset").is_retryable());
        assert!(!NetworkError::transport_fatal("invalid certificate").is_retryable());
        assert!(NetworkError::Timeout.is_retryable());
        assert!(NetworkError::Status { status: 503 }.is_retryable());
        assert!(NetworkError::Status { status: 429 }.is_retryable());
        assert!(!NetworkError::Status { status: 404 }.is_retryable());
        assert!(!NetworkError::Decode("eof".into()).is_retryable());
        assert!(!NetworkError::NotConnected.is_retryable());
    }

    #[test]
    fn error_display() {
        let err = NetworkError::NotConnected;
        assert_eq!(err.to_string(), "not connected to server");

        let err = NetworkError::Status { status: 502 };
        assert!(err.to_string().contains("502"));
    }
}

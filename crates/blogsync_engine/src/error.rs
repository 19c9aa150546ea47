//! Error types for the engine.

use blogsync_remote::NetworkError;
use blogsync_storage::StorageError;
use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the sync policy and the repository.
///
/// The engine never retries; both kinds are passed to the caller as-is.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Reading the local store failed. The remote source was not called.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Fetching from the remote source failed. The local store is untouched.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

impl SyncError {
    /// Returns true if the failure came from the remote source.
    pub fn is_network(&self) -> bool {
        matches!(self, SyncError::Network(_))
    }

    /// Returns true if the failure came from the local store.
    pub fn is_storage(&self) -> bool {
        matches!(self, SyncError::Storage(_))
    }
}

//! The local-first sync policy.
//!
//! [`SyncPolicy::resolve`] is the single decision point of the data layer:
//!
//! ```text
//! local() ──err──────────────────────────────▶ SyncError::Storage
//!    │
//!    ├─ non-empty && !force_remote ──────────▶ cached records
//!    │
//!    └─ remote() ──err───────────────────────▶ SyncError::Network
//!          │
//!          └─ ok ─┬─ spawn insert(records) ──▶ WriteBackFeed
//!                 └──────────────────────────▶ remote records
//! ```
//!
//! The insert is never awaited by the caller. Its outcome is published on the
//! [`WriteBackFeed`] and [`SyncPolicy::flush`] waits for pending inserts.

use crate::error::{SyncError, SyncResult};
use crate::write_back::{WriteBackEvent, WriteBackFeed};
use blogsync_model::Entity;
use blogsync_remote::NetworkResult;
use blogsync_storage::StorageResult;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Serve-from-cache-else-fetch-and-persist policy.
///
/// One policy is shared by every collection of a repository. It must be used
/// from within a tokio runtime, since write-backs are spawned as tasks.
pub struct SyncPolicy {
    feed: Arc<WriteBackFeed>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncPolicy {
    /// Creates a policy with a fresh write-back feed.
    pub fn new() -> Self {
        Self::with_feed(Arc::new(WriteBackFeed::new()))
    }

    /// Creates a policy publishing to the given feed.
    pub fn with_feed(feed: Arc<WriteBackFeed>) -> Self {
        Self {
            feed,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Returns the write-back feed.
    pub fn feed(&self) -> &Arc<WriteBackFeed> {
        &self.feed
    }

    /// Resolves a collection, preferring the local cache.
    ///
    /// `local` is always called first. If it yields a non-empty list and
    /// `force_remote` is false, that list is returned and `remote` is never
    /// called. Otherwise `remote` is called exactly once; on success its
    /// records are handed to `insert` in a detached task and returned.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Storage`] if `local` fails; `remote` is not called.
    /// - [`SyncError::Network`] if `remote` fails; `insert` is not called.
    ///
    /// A failing `insert` never fails the resolve.
    pub async fn resolve<T, L, LF, R, RF, I, IF>(
        &self,
        local: L,
        remote: R,
        insert: I,
        force_remote: bool,
    ) -> SyncResult<Vec<T>>
    where
        T: Entity,
        L: FnOnce() -> LF,
        LF: Future<Output = StorageResult<Vec<T>>>,
        R: FnOnce() -> RF,
        RF: Future<Output = NetworkResult<Vec<T>>>,
        I: FnOnce(Vec<T>) -> IF,
        IF: Future<Output = StorageResult<()>> + Send + 'static,
    {
        let collection = T::COLLECTION;
        let cached = local().await?;

        if !cached.is_empty() && !force_remote {
            tracing::debug!(%collection, records = cached.len(), "served from cache");
            return Ok(cached);
        }

        tracing::info!(
            %collection,
            cached = cached.len(),
            force_remote,
            "fetching from remote"
        );
        let fetched = remote().await.map_err(SyncError::from)?;

        let records = fetched.len();
        let write = insert(fetched.clone());
        let feed = Arc::clone(&self.feed);
        let handle = tokio::spawn(async move {
            match write.await {
                Ok(()) => {
                    tracing::debug!(%collection, records, "write-back persisted");
                    feed.emit(WriteBackEvent::persisted(collection, records));
                }
                Err(e) => {
                    tracing::warn!(%collection, records, error = %e, "write-back failed");
                    feed.emit(WriteBackEvent::failed(collection, records, e.to_string()));
                }
            }
        });

        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
        drop(pending);

        Ok(fetched)
    }

    /// Returns the number of write-backs that have not finished yet.
    pub fn pending_writes(&self) -> usize {
        self.pending.lock().iter().filter(|h| !h.is_finished()).count()
    }

    /// Waits for every write-back spawned so far.
    ///
    /// Write-backs are never cancelled; this only waits.
    pub async fn flush(&self) {
        let handles = std::mem::take(&mut *self.pending.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "write-back task did not complete");
            }
        }
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self::new()
    }
}

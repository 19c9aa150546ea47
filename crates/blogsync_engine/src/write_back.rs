//! Feed of write-back outcomes.
//!
//! After a remote fetch the engine persists the result in a detached task.
//! The caller never waits for it, so its outcome is published here instead:
//! - CLI and UI status lines
//! - Tests that need to observe the cache after a fetch
//! - Audit logging of failed inserts
//!
//! # Usage
//!
//! ```rust,ignore
//! let policy = SyncPolicy::new();
//! let mut events = policy.feed().subscribe();
//!
//! let posts = repository.get_posts(1, 20, false).await?;
//! if let Some(event) = events.recv().await {
//!     println!("write-back: {event:?}");
//! }
//! ```

use blogsync_model::Collection;
use parking_lot::RwLock;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// How a write-back ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBackOutcome {
    /// Records were persisted.
    Persisted,
    /// The insert failed; the cache may be stale.
    Failed(String),
}

/// A single write-back event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteBackEvent {
    /// Collection written to.
    pub collection: Collection,
    /// Number of records in the batch.
    pub records: usize,
    /// Outcome of the insert.
    pub outcome: WriteBackOutcome,
}

impl WriteBackEvent {
    /// Creates a success event.
    pub fn persisted(collection: Collection, records: usize) -> Self {
        Self {
            collection,
            records,
            outcome: WriteBackOutcome::Persisted,
        }
    }

    /// Creates a failure event.
    pub fn failed(collection: Collection, records: usize, message: impl Into<String>) -> Self {
        Self {
            collection,
            records,
            outcome: WriteBackOutcome::Failed(message.into()),
        }
    }

    /// Returns true if the insert failed.
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, WriteBackOutcome::Failed(_))
    }
}

/// A feed that distributes write-back outcomes to subscribers.
///
/// The feed:
/// - Preserves emission order per subscriber
/// - Supports multiple subscribers
/// - Keeps a bounded history for polling
/// - Is thread-safe
pub struct WriteBackFeed {
    /// Subscribers (senders).
    subscribers: RwLock<Vec<UnboundedSender<WriteBackEvent>>>,
    /// History of recent events for polling.
    history: RwLock<Vec<WriteBackEvent>>,
    /// Maximum history size.
    max_history: usize,
}

impl WriteBackFeed {
    /// Creates a new feed.
    pub fn new() -> Self {
        Self::with_max_history(256)
    }

    /// Creates a feed with a specific history limit.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            history: RwLock::new(Vec::new()),
            max_history,
        }
    }

    /// Subscribes to the feed.
    ///
    /// Returns a receiver that will receive all future events.
    pub fn subscribe(&self) -> UnboundedReceiver<WriteBackEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: WriteBackEvent) {
        {
            let mut history = self.history.write();
            history.push(event.clone());
            if history.len() > self.max_history {
                let to_remove = history.len() - self.max_history;
                history.drain(0..to_remove);
            }
        }

        // Send to subscribers (remove disconnected ones)
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Returns the retained history, oldest first.
    pub fn history(&self) -> Vec<WriteBackEvent> {
        self.history.read().clone()
    }

    /// Returns the retained failures, oldest first.
    pub fn failures(&self) -> Vec<WriteBackEvent> {
        self.history
            .read()
            .iter()
            .filter(|e| e.is_failure())
            .cloned()
            .collect()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for WriteBackFeed {
    fn default() -> Self {
        Self::new()
    }
}

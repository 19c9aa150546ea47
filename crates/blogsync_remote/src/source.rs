//! Remote source abstraction.

use crate::error::{NetworkError, NetworkResult};
use async_trait::async_trait;
use blogsync_model::{Comment, Post, User};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A remote source fetches collections from the blog API.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, mock for testing, etc.). Implementations own their
/// retry policy; callers issue exactly one call per fetch.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetches all users.
    async fn fetch_users(&self) -> NetworkResult<Vec<User>>;

    /// Fetches all comments.
    async fn fetch_comments(&self) -> NetworkResult<Vec<Comment>>;

    /// Fetches one page of posts. Pages are 1-based.
    async fn fetch_posts(&self, page: u32, limit: u32) -> NetworkResult<Vec<Post>>;
}

#[async_trait]
impl<R: RemoteSource + ?Sized> RemoteSource for std::sync::Arc<R> {
    async fn fetch_users(&self) -> NetworkResult<Vec<User>> {
        (**self).fetch_users().await
    }

    async fn fetch_comments(&self) -> NetworkResult<Vec<Comment>> {
        (**self).fetch_comments().await
    }

    async fn fetch_posts(&self, page: u32, limit: u32) -> NetworkResult<Vec<Post>> {
        (**self).fetch_posts(page, limit).await
    }
}

/// A request observed by [`MockRemoteSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    /// `fetch_users`.
    Users,
    /// `fetch_comments`.
    Comments,
    /// `fetch_posts(page, limit)`.
    Posts {
        /// Requested page.
        page: u32,
        /// Requested page size.
        limit: u32,
    },
}

/// A mock remote source for testing.
///
/// Serves fixed collections; posts are paged out of the full list the way
/// the real API does. Every call is recorded.
#[derive(Debug)]
pub struct MockRemoteSource {
    connected: AtomicBool,
    users: Mutex<Vec<User>>,
    comments: Mutex<Vec<Comment>>,
    posts: Mutex<Vec<Post>>,
    failure: Mutex<Option<NetworkError>>,
    calls: Mutex<Vec<RemoteCall>>,
}

impl MockRemoteSource {
    /// Creates a new mock source with empty collections.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            users: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sets the users served by `fetch_users`.
    pub fn set_users(&self, users: Vec<User>) {
        *self.users.lock() = users;
    }

    /// Sets the comments served by `fetch_comments`.
    pub fn set_comments(&self, comments: Vec<Comment>) {
        *self.comments.lock() = comments;
    }

    /// Sets the full post list that `fetch_posts` pages through.
    pub fn set_posts(&self, posts: Vec<Post>) {
        *self.posts.lock() = posts;
    }

    /// Makes every following call fail with `error` until cleared.
    pub fn set_failure(&self, error: Option<NetworkError>) {
        *self.failure.lock() = error;
    }

    /// Sets the connected state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Returns every call made so far, in order.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn begin(&self, call: RemoteCall) -> NetworkResult<()> {
        self.calls.lock().push(call);
        if !self.connected.load(Ordering::SeqCst) {
            return Err(NetworkError::NotConnected);
        }
        match self.failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for MockRemoteSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteSource for MockRemoteSource {
    async fn fetch_users(&self) -> NetworkResult<Vec<User>> {
        self.begin(RemoteCall::Users)?;
        Ok(self.users.lock().clone())
    }

    async fn fetch_comments(&self) -> NetworkResult<Vec<Comment>> {
        self.begin(RemoteCall::Comments)?;
        Ok(self.comments.lock().clone())
    }

    async fn fetch_posts(&self, page: u32, limit: u32) -> NetworkResult<Vec<Post>> {
        self.begin(RemoteCall::Posts { page, limit })?;
        let skip = page.saturating_sub(1) as usize * limit as usize;
        Ok(self
            .posts
            .lock()
            .iter()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogsync_model::EntityId;

    fn posts(count: u32) -> Vec<Post> {
        (1..=count)
            .map(|i| Post {
                id: EntityId::new(i),
                user_id: EntityId::new(1),
                title: format!("post {i}"),
                body: String::new(),
            })
            .collect()
    }

    #[tokio::test]
    async fn mock_pages_through_posts() {
        let remote = MockRemoteSource::new();
        remote.set_posts(posts(45));

        assert_eq!(remote.fetch_posts(1, 20).await.unwrap().len(), 20);
        assert_eq!(remote.fetch_posts(3, 20).await.unwrap().len(), 5);
        assert!(remote.fetch_posts(4, 20).await.unwrap().is_empty());

        let first = remote.fetch_posts(2, 20).await.unwrap();
        assert_eq!(first[0].id, EntityId::new(21));
    }

    #[tokio::test]
    async fn mock_records_calls() {
        let remote = MockRemoteSource::new();
        remote.fetch_users().await.unwrap();
        remote.fetch_posts(2, 10).await.unwrap();

        assert_eq!(
            remote.calls(),
            vec![RemoteCall::Users, RemoteCall::Posts { page: 2, limit: 10 }]
        );
    }

    #[tokio::test]
    async fn mock_not_connected_error() {
        let remote = MockRemoteSource::new();
        remote.set_connected(false);

        let result = remote.fetch_comments().await;
        assert!(matches!(result, Err(NetworkError::NotConnected)));
        assert_eq!(remote.call_count(), 1);
    }

    #[tokio::test]
    async fn mock_failure_until_cleared() {
        let remote = MockRemoteSource::new();
        remote.set_failure(Some(NetworkError::Timeout));
        assert_eq!(remote.fetch_users().await, Err(NetworkError::Timeout));

        remote.set_failure(None);
        assert!(remote.fetch_users().await.is_ok());
    }
}

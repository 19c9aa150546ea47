//! Test fixtures and repository helpers.
//!
//! Provides entity builders, seeded repositories and test doubles for the
//! engine's collaborators.

use async_trait::async_trait;
use blogsync_engine::{
    BlogRepository, LocalStores, PostsSource, ScreenRenderer, ScreenState, SyncPolicy, SyncResult,
};
use blogsync_model::{Comment, Entity, EntityId, Post, User};
use blogsync_remote::MockRemoteSource;
use blogsync_storage::{InMemoryStore, LocalStore, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Semaphore;

/// Builds a post.
pub fn post(id: u32, user_id: u32) -> Post {
    Post {
        id: EntityId::new(id),
        user_id: EntityId::new(user_id),
        title: format!("Post {id}"),
        body: format!("Body of post {id}"),
    }
}

/// Builds posts with consecutive ids, all by user 1.
pub fn posts(ids: RangeInclusive<u32>) -> Vec<Post> {
    ids.map(|id| post(id, 1)).collect()
}

/// Builds a user.
pub fn user(id: u32) -> User {
    User {
        id: EntityId::new(id),
        name: format!("User {id}"),
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
    }
}

/// Builds a comment.
pub fn comment(id: u32, post_id: u32) -> Comment {
    Comment {
        id: EntityId::new(id),
        post_id: EntityId::new(post_id),
        name: format!("Comment {id}"),
        email: format!("reader{id}@example.com"),
        body: format!("Comment {id} on post {post_id}"),
    }
}

/// A repository over a mock remote and in-memory stores.
pub struct TestRepository {
    /// The repository.
    pub repo: Arc<BlogRepository<Arc<MockRemoteSource>>>,
    /// The mock remote, shared with the repository.
    pub remote: Arc<MockRemoteSource>,
    /// The in-memory posts store, shared with the repository.
    pub posts: Arc<InMemoryStore<Post>>,
    /// The in-memory users store, shared with the repository.
    pub users: Arc<InMemoryStore<User>>,
    /// The in-memory comments store, shared with the repository.
    pub comments: Arc<InMemoryStore<Comment>>,
}

impl TestRepository {
    /// Creates a repository with empty stores and an empty remote.
    pub fn in_memory() -> Self {
        let remote = Arc::new(MockRemoteSource::new());
        let posts: Arc<InMemoryStore<Post>> = Arc::new(InMemoryStore::new());
        let users: Arc<InMemoryStore<User>> = Arc::new(InMemoryStore::new());
        let comments: Arc<InMemoryStore<Comment>> = Arc::new(InMemoryStore::new());
        let stores = LocalStores {
            users: Arc::clone(&users) as Arc<dyn LocalStore<User>>,
            comments: Arc::clone(&comments) as Arc<dyn LocalStore<Comment>>,
            posts: Arc::clone(&posts) as Arc<dyn LocalStore<Post>>,
        };
        let repo = Arc::new(BlogRepository::new(
            Arc::clone(&remote),
            stores,
            SyncPolicy::new(),
        ));
        Self {
            repo,
            remote,
            posts,
            users,
            comments,
        }
    }

    /// Creates a repository whose posts cache already holds `cached`.
    pub fn with_cached_posts(cached: Vec<Post>) -> Self {
        let fixture = Self::in_memory();
        fixture
            .posts
            .insert_all(&cached)
            .expect("in-memory insert cannot fail");
        fixture
    }

    /// Waits for pending write-backs.
    pub async fn flush(&self) {
        self.repo.policy().flush().await;
    }
}

/// A temporary data directory, removed on drop.
pub struct TempDataDir {
    dir: TempDir,
}

impl TempDataDir {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the directory path.
    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}

/// A store whose reads and writes can be made to fail.
///
/// Successful operations are delegated to an in-memory store.
pub struct FailingStore<T> {
    inner: InMemoryStore<T>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl<T: Entity> FailingStore<T> {
    /// Creates a store that does not fail yet.
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Creates a store whose reads fail.
    pub fn failing_reads() -> Self {
        let store = Self::new();
        store.set_fail_reads(true);
        store
    }

    /// Creates a store whose writes fail.
    pub fn failing_writes() -> Self {
        let store = Self::new();
        store.set_fail_writes(true);
        store
    }

    /// Makes reads fail or succeed.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes writes fail or succeed.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of reads attempted.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of writes attempted.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Records stored so far.
    pub fn stored(&self) -> Vec<T> {
        self.inner.get_all().expect("in-memory read cannot fail")
    }
}

impl<T: Entity> Default for FailingStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> LocalStore<T> for FailingStore<T> {
    fn get_all(&self) -> StorageResult<Vec<T>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::io("injected read failure"));
        }
        self.inner.get_all()
    }

    fn insert_all(&self, records: &[T]) -> StorageResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::io("injected write failure"));
        }
        self.inner.insert_all(records)
    }

    fn get(&self, id: EntityId) -> StorageResult<Option<T>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::io("injected read failure"));
        }
        self.inner.get(id)
    }
}

/// A request observed by [`ScriptedPosts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostsRequest {
    /// Requested page.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Whether a remote fetch was forced.
    pub load_more: bool,
}

/// A posts source that replays queued results.
///
/// When gated, every call waits for a permit from [`ScriptedPosts::release`]
/// before answering, which lets tests hold a load in flight.
pub struct ScriptedPosts {
    results: Mutex<VecDeque<SyncResult<Vec<Post>>>>,
    requests: Mutex<Vec<PostsRequest>>,
    gate: Option<Semaphore>,
}

impl ScriptedPosts {
    /// Creates a source that answers immediately.
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Creates a source whose calls wait for [`release`](Self::release).
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Queues a result. An empty queue answers with an empty page.
    pub fn push(&self, result: SyncResult<Vec<Post>>) {
        self.results.lock().push_back(result);
    }

    /// Lets `calls` waiting calls proceed.
    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    /// Returns every request so far, in order.
    pub fn requests(&self) -> Vec<PostsRequest> {
        self.requests.lock().clone()
    }
}

impl Default for ScriptedPosts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostsSource for ScriptedPosts {
    async fn posts(&self, page: u32, limit: u32, load_more: bool) -> SyncResult<Vec<Post>> {
        self.requests.lock().push(PostsRequest {
            page,
            limit,
            load_more,
        });
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.results.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// A renderer that records every state it is given.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Rendered states, in order.
    pub states: Vec<ScreenState>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the rendered states, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.states.iter().map(ScreenState::name).collect()
    }

    /// Ids of every post delivered by `DataAvailable`, in order.
    pub fn delivered_ids(&self) -> Vec<u32> {
        self.states
            .iter()
            .filter_map(|state| match state {
                ScreenState::DataAvailable(items) => Some(items),
                _ => None,
            })
            .flatten()
            .map(|post| post.id.as_u32())
            .collect()
    }

    /// `last_page` of every `FinishedLoading`, in order.
    pub fn finished(&self) -> Vec<bool> {
        self.states
            .iter()
            .filter_map(|state| match state {
                ScreenState::FinishedLoading { last_page } => Some(*last_page),
                _ => None,
            })
            .collect()
    }
}

impl ScreenRenderer for RecordingRenderer {
    fn render(&mut self, state: ScreenState) {
        self.states.push(state);
    }
}

//! Blog repository: the sync policy bound to the three collections.

use crate::error::SyncResult;
use crate::policy::SyncPolicy;
use async_trait::async_trait;
use blogsync_model::{Comment, EntityId, Post, User};
use blogsync_remote::RemoteSource;
use blogsync_storage::{InMemoryStore, JsonFileStore, LocalStore, StorageResult};
use std::path::Path;
use std::sync::Arc;

/// Source of post pages for the pagination controller.
#[async_trait]
pub trait PostsSource: Send + Sync + 'static {
    /// Returns one page of posts.
    ///
    /// `load_more` forces a remote fetch even when posts are cached.
    async fn posts(&self, page: u32, limit: u32, load_more: bool) -> SyncResult<Vec<Post>>;
}

/// The local stores of a repository, one per collection.
#[derive(Clone)]
pub struct LocalStores {
    /// Cached users.
    pub users: Arc<dyn LocalStore<User>>,
    /// Cached comments.
    pub comments: Arc<dyn LocalStore<Comment>>,
    /// Cached posts.
    pub posts: Arc<dyn LocalStore<Post>>,
}

impl LocalStores {
    /// Empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryStore::<User>::new()),
            comments: Arc::new(InMemoryStore::<Comment>::new()),
            posts: Arc::new(InMemoryStore::<Post>::new()),
        }
    }

    /// File-backed stores, one JSON file per collection under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or an existing file cannot be read.
    pub fn open_json(dir: &Path) -> StorageResult<Self> {
        Ok(Self {
            users: Arc::new(JsonFileStore::<User>::open_in(dir)?),
            comments: Arc::new(JsonFileStore::<Comment>::open_in(dir)?),
            posts: Arc::new(JsonFileStore::<Post>::open_in(dir)?),
        })
    }
}

/// A post with its author and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    /// The post.
    pub post: Post,
    /// The author, if known.
    pub author: Option<User>,
    /// Comments on the post, in id order.
    pub comments: Vec<Comment>,
}

/// Local-first access to users, comments and posts.
///
/// Every read goes through [`SyncPolicy::resolve`] with the store for that
/// collection as cache and `remote` as the source of truth.
pub struct BlogRepository<R: RemoteSource> {
    remote: R,
    stores: LocalStores,
    policy: SyncPolicy,
}

impl<R: RemoteSource> BlogRepository<R> {
    /// Creates a repository.
    pub fn new(remote: R, stores: LocalStores, policy: SyncPolicy) -> Self {
        Self {
            remote,
            stores,
            policy,
        }
    }

    /// Returns the sync policy.
    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Returns the local stores.
    pub fn stores(&self) -> &LocalStores {
        &self.stores
    }

    /// Returns the remote source.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Returns all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the fetch fails.
    pub async fn get_users(&self, force_remote: bool) -> SyncResult<Vec<User>> {
        let store = &self.stores.users;
        let writer = Arc::clone(store);
        self.policy
            .resolve(
                || async { store.get_all() },
                || self.remote.fetch_users(),
                move |records: Vec<User>| async move { writer.insert_all(&records) },
                force_remote,
            )
            .await
    }

    /// Returns all comments.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the fetch fails.
    pub async fn get_comments(&self, force_remote: bool) -> SyncResult<Vec<Comment>> {
        let store = &self.stores.comments;
        let writer = Arc::clone(store);
        self.policy
            .resolve(
                || async { store.get_all() },
                || self.remote.fetch_comments(),
                move |records: Vec<Comment>| async move { writer.insert_all(&records) },
                force_remote,
            )
            .await
    }

    /// Returns one page of posts.
    ///
    /// The local read covers every cached post, so any cached post
    /// satisfies a page request unless `load_more` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the fetch fails.
    pub async fn get_posts(&self, page: u32, limit: u32, load_more: bool) -> SyncResult<Vec<Post>> {
        let store = &self.stores.posts;
        let writer = Arc::clone(store);
        self.policy
            .resolve(
                || async { store.get_all() },
                || self.remote.fetch_posts(page, limit),
                move |records: Vec<Post>| async move { writer.insert_all(&records) },
                load_more,
            )
            .await
    }

    /// Looks up a cached post.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get_post(&self, id: EntityId) -> SyncResult<Option<Post>> {
        Ok(self.stores.posts.get(id)?)
    }

    /// Returns a cached post together with its author and comments.
    ///
    /// Users and comments are resolved like any other read, so they are
    /// fetched and cached on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if a store cannot be read or a fetch fails.
    pub async fn post_detail(&self, id: EntityId) -> SyncResult<Option<PostDetail>> {
        let Some(post) = self.get_post(id)? else {
            return Ok(None);
        };

        let author = self
            .get_users(false)
            .await?
            .into_iter()
            .find(|user| user.id == post.user_id);
        let comments = self
            .get_comments(false)
            .await?
            .into_iter()
            .filter(|comment| comment.post_id == post.id)
            .collect();

        Ok(Some(PostDetail {
            post,
            author,
            comments,
        }))
    }

    /// Refetches every collection from the remote source.
    ///
    /// Returns the number of users, comments and posts fetched.
    ///
    /// # Errors
    ///
    /// Stops at the first failing collection.
    pub async fn refresh_all(&self, page_size: u32) -> SyncResult<(usize, usize, usize)> {
        let users = self.get_users(true).await?.len();
        let comments = self.get_comments(true).await?.len();
        let posts = self.get_posts(1, page_size, true).await?.len();
        Ok((users, comments, posts))
    }
}

#[async_trait]
impl<R: RemoteSource + 'static> PostsSource for BlogRepository<R> {
    async fn posts(&self, page: u32, limit: u32, load_more: bool) -> SyncResult<Vec<Post>> {
        self.get_posts(page, limit, load_more).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogsync_remote::{MockRemoteSource, RemoteCall};

    fn post(id: u32, user_id: u32) -> Post {
        Post {
            id: EntityId::new(id),
            user_id: EntityId::new(user_id),
            title: format!("title {id}"),
            body: format!("body {id}"),
        }
    }

    fn user(id: u32) -> User {
        User {
            id: EntityId::new(id),
            name: format!("User {id}"),
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
        }
    }

    fn comment(id: u32, post_id: u32) -> Comment {
        Comment {
            id: EntityId::new(id),
            post_id: EntityId::new(post_id),
            name: format!("comment {id}"),
            email: "reader@example.com".into(),
            body: "nice".into(),
        }
    }

    fn repository() -> BlogRepository<Arc<MockRemoteSource>> {
        BlogRepository::new(
            Arc::new(MockRemoteSource::new()),
            LocalStores::in_memory(),
            SyncPolicy::new(),
        )
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let repo = repository();
        repo.remote().set_users(vec![user(1), user(2)]);

        let first = repo.get_users(false).await.unwrap();
        repo.policy().flush().await;
        let second = repo.get_users(false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.remote().calls(), vec![RemoteCall::Users]);
    }

    #[tokio::test]
    async fn get_posts_requests_page_and_limit() {
        let repo = repository();
        repo.remote().set_posts((1..=45).map(|id| post(id, 1)).collect());

        let page = repo.get_posts(2, 20, true).await.unwrap();

        assert_eq!(page.first().map(|p| p.id), Some(EntityId::new(21)));
        assert_eq!(
            repo.remote().calls(),
            vec![RemoteCall::Posts { page: 2, limit: 20 }]
        );
    }

    #[tokio::test]
    async fn get_post_reads_cache_only() {
        let repo = repository();
        repo.remote().set_posts(vec![post(1, 1)]);

        assert_eq!(repo.get_post(EntityId::new(1)).unwrap(), None);
        repo.get_posts(1, 20, false).await.unwrap();
        repo.policy().flush().await;

        assert_eq!(repo.get_post(EntityId::new(1)).unwrap(), Some(post(1, 1)));
        assert_eq!(repo.remote().call_count(), 1);
    }

    #[tokio::test]
    async fn post_detail_joins_author_and_comments() {
        let repo = repository();
        repo.stores().posts.insert_all(&[post(7, 2)]).unwrap();
        repo.remote().set_users(vec![user(1), user(2)]);
        repo.remote()
            .set_comments(vec![comment(1, 7), comment(2, 8), comment(3, 7)]);

        let detail = repo.post_detail(EntityId::new(7)).await.unwrap().unwrap();

        assert_eq!(detail.post, post(7, 2));
        assert_eq!(detail.author, Some(user(2)));
        let ids: Vec<u32> = detail.comments.iter().map(|c| c.id.as_u32()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn post_detail_of_unknown_post_makes_no_calls() {
        let repo = repository();

        assert_eq!(repo.post_detail(EntityId::new(99)).await.unwrap(), None);
        assert_eq!(repo.remote().call_count(), 0);
    }

    #[tokio::test]
    async fn refresh_all_forces_every_collection() {
        let repo = repository();
        repo.stores().users.insert_all(&[user(1)]).unwrap();
        repo.remote().set_users(vec![user(1), user(2)]);
        repo.remote().set_comments(vec![comment(1, 1)]);
        repo.remote().set_posts(vec![post(1, 1)]);

        let counts = repo.refresh_all(20).await.unwrap();
        repo.policy().flush().await;

        assert_eq!(counts, (2, 1, 1));
        assert_eq!(repo.remote().call_count(), 3);
        assert_eq!(repo.stores().users.get_all().unwrap().len(), 2);
    }
}

//! Repository tests over file-backed stores.

use blogsync_engine::{BlogRepository, LocalStores, SyncError, SyncPolicy};
use blogsync_model::EntityId;
use blogsync_remote::{MockRemoteSource, NetworkError, RemoteCall};
use blogsync_testkit::prelude::*;
use std::sync::Arc;

fn file_repository(
    data: &TempDataDir,
    remote: &Arc<MockRemoteSource>,
) -> BlogRepository<Arc<MockRemoteSource>> {
    let stores = LocalStores::open_json(data.path()).unwrap();
    BlogRepository::new(Arc::clone(remote), stores, SyncPolicy::new())
}

#[tokio::test]
async fn cache_survives_reopen() {
    let data = TempDataDir::new();
    let remote = Arc::new(MockRemoteSource::new());
    remote.set_users(vec![user(1), user(2)]);
    remote.set_posts(posts(1..=30));

    {
        let repo = file_repository(&data, &remote);
        repo.get_users(false).await.unwrap();
        repo.get_posts(1, 20, false).await.unwrap();
        repo.policy().flush().await;
    }

    remote.set_failure(Some(NetworkError::NotConnected));
    let repo = file_repository(&data, &remote);
    let users = repo.get_users(false).await.unwrap();
    let cached = repo.get_posts(1, 20, false).await.unwrap();

    assert_eq!(users, vec![user(1), user(2)]);
    assert_eq!(cached.len(), 20);
    assert_eq!(remote.call_count(), 2);
    assert!(data.path().join("users.json").exists());
    assert!(data.path().join("posts.json").exists());
}

#[tokio::test]
async fn pages_accumulate_in_the_cache() {
    let data = TempDataDir::new();
    let remote = Arc::new(MockRemoteSource::new());
    remote.set_posts(posts(1..=45));
    let repo = file_repository(&data, &remote);

    for page in 1..=3 {
        repo.get_posts(page, 20, true).await.unwrap();
    }
    repo.policy().flush().await;

    let all = repo.get_posts(1, 20, false).await.unwrap();
    assert_eq!(all.len(), 45);
    assert_eq!(remote.call_count(), 3);
}

#[tokio::test]
async fn post_detail_caches_users_and_comments() {
    let data = TempDataDir::new();
    let remote = Arc::new(MockRemoteSource::new());
    remote.set_posts(posts(1..=5));
    remote.set_users(vec![user(1)]);
    remote.set_comments(vec![comment(1, 3), comment(2, 4), comment(3, 3)]);
    let repo = file_repository(&data, &remote);

    repo.get_posts(1, 20, false).await.unwrap();
    repo.policy().flush().await;

    let detail = repo.post_detail(EntityId::new(3)).await.unwrap().unwrap();
    repo.policy().flush().await;
    let again = repo.post_detail(EntityId::new(3)).await.unwrap().unwrap();

    assert_eq!(detail, again);
    assert_eq!(detail.author, Some(user(1)));
    assert_eq!(detail.comments, vec![comment(1, 3), comment(3, 3)]);
    assert_eq!(
        remote.calls(),
        vec![
            RemoteCall::Posts { page: 1, limit: 20 },
            RemoteCall::Users,
            RemoteCall::Comments,
        ]
    );
}

#[tokio::test]
async fn post_detail_propagates_fetch_failure() {
    let fixture = TestRepository::with_cached_posts(posts(1..=3));
    fixture.remote.set_failure(Some(NetworkError::Timeout));

    let result = fixture.repo.post_detail(EntityId::new(1)).await;

    assert!(matches!(result, Err(SyncError::Network(NetworkError::Timeout))));
}

#[tokio::test]
async fn refresh_all_overwrites_changed_records() {
    let fixture = TestRepository::with_cached_posts(posts(1..=2));
    let mut renamed = post(1, 1);
    renamed.title = "Renamed".into();
    fixture.remote.set_posts(vec![renamed.clone(), post(2, 1)]);

    let (users, comments, posts) = fixture.repo.refresh_all(20).await.unwrap();
    fixture.flush().await;

    assert_eq!((users, comments, posts), (0, 0, 2));
    assert_eq!(fixture.repo.get_post(EntityId::new(1)).unwrap(), Some(renamed));
}

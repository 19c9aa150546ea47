//! Posts command implementation.

use super::{CommandError, CommandResult, OutputFormat};
use crate::renderer::TerminalRenderer;
use blogsync_engine::{render_loop, render_ready, BlogRepository, EngineConfig, PostsController};
use blogsync_model::EntityId;
use blogsync_remote::RemoteSource;
use std::io::Write;
use std::sync::Arc;

/// Runs the posts command.
///
/// Binds a posts screen, then scrolls to the end of the printed list until
/// `pages` pages were requested or the last page is reached. With `open`,
/// a delivered post is selected and its detail printed.
pub async fn run<R, W>(
    repo: Arc<BlogRepository<R>>,
    config: &EngineConfig,
    pages: u32,
    open: Option<EntityId>,
    format: OutputFormat,
    out: &mut W,
) -> CommandResult<()>
where
    R: RemoteSource + 'static,
    W: Write,
{
    let mut renderer = TerminalRenderer::new(&mut *out, format);
    let (controller, mut states) = PostsController::attach(Arc::clone(&repo), config);
    let mut opened = None;

    if let Some(load) = controller.bind() {
        load.await?;
    }
    render_ready(&mut states, &mut renderer);

    for _ in 1..pages {
        let position = renderer.scrolled_to_end(config.page_size as usize);
        let Some(load) = controller.on_scrolled(position) else {
            break;
        };
        load.await?;
        render_ready(&mut states, &mut renderer);
    }

    if let Some(id) = open {
        match renderer.delivered(id).cloned() {
            Some(post) => {
                controller.select_post(post);
                opened = Some(id);
            }
            None => tracing::warn!(post = %id, "post to open was not loaded"),
        }
    }

    drop(controller);
    render_loop(states, &mut renderer).await;

    let errors = renderer.errors();
    tracing::debug!(shown = renderer.shown(), errors, "posts screen closed");
    drop(renderer);

    if let Some(id) = opened {
        // The detail reads the post back from the cache.
        repo.policy().flush().await;
        super::post::run(&repo, id, format, out).await?;
    }
    if errors > 0 {
        return Err(CommandError::LoadFailed(errors));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogsync_remote::NetworkError;
    use blogsync_engine::{LocalStores, SyncPolicy};
    use blogsync_remote::MockRemoteSource;
    use blogsync_testkit::{comment, posts, user, TempDataDir, TestRepository};

    fn config() -> EngineConfig {
        EngineConfig::new().with_page_size(10)
    }

    async fn output(
        fixture: &TestRepository,
        pages: u32,
        open: Option<u32>,
    ) -> (CommandResult<()>, String) {
        let mut out = Vec::new();
        let result = run(
            Arc::clone(&fixture.repo),
            &config(),
            pages,
            open.map(EntityId::new),
            OutputFormat::Text,
            &mut out,
        )
        .await;
        fixture.flush().await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn prints_requested_pages() {
        let fixture = TestRepository::in_memory();
        fixture.remote.set_posts(posts(1..=25));

        let (result, text) = output(&fixture, 2, None).await;

        result.unwrap();
        assert_eq!(text.lines().count(), 20);
        assert!(text.lines().last().unwrap().starts_with("#20"));
        assert_eq!(fixture.posts.len(), 20);
    }

    #[tokio::test]
    async fn stops_at_last_page() {
        let fixture = TestRepository::in_memory();
        fixture.remote.set_posts(posts(1..=15));

        let (result, text) = output(&fixture, 10, None).await;

        result.unwrap();
        assert!(text.ends_with("-- no more posts --\n"));
        assert_eq!(fixture.remote.call_count(), 3);
    }

    #[tokio::test]
    async fn failed_load_is_reported() {
        let fixture = TestRepository::in_memory();
        fixture.remote.set_failure(Some(NetworkError::Timeout));

        let (result, text) = output(&fixture, 1, None).await;

        assert!(matches!(result, Err(CommandError::LoadFailed(1))));
        assert_eq!(text, "Could not load posts. Please try again later.\n");
    }

    #[tokio::test]
    async fn open_prints_post_detail() {
        let fixture = TestRepository::with_cached_posts(posts(1..=5));
        fixture.remote.set_users(vec![user(1)]);
        fixture.remote.set_comments(vec![comment(1, 3)]);

        let (result, text) = output(&fixture, 1, Some(3)).await;

        result.unwrap();
        assert!(text.contains("Opening post #3"));
        assert!(text.contains("by User 1"));
        assert!(text.contains("Comment 1"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn open_works_on_an_empty_file_cache() {
        for _ in 0..10 {
            let dir = TempDataDir::new();
            let remote = Arc::new(MockRemoteSource::new());
            remote.set_posts(posts(1..=20));
            remote.set_users(vec![user(1)]);
            let stores = LocalStores::open_json(dir.path()).unwrap();
            let repo = Arc::new(BlogRepository::new(
                Arc::clone(&remote),
                stores,
                SyncPolicy::new(),
            ));

            let mut out = Vec::new();
            run(
                Arc::clone(&repo),
                &config(),
                1,
                Some(EntityId::new(3)),
                OutputFormat::Text,
                &mut out,
            )
            .await
            .unwrap();
            repo.policy().flush().await;

            let text = String::from_utf8(out).unwrap();
            assert!(text.contains("Opening post #3"));
            assert!(text.contains("Post 3\nby User 1 (@user1)\n"));
        }
    }
}

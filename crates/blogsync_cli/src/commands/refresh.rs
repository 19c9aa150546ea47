//! Refresh command implementation.

use super::{CommandResult, OutputFormat};
use blogsync_engine::BlogRepository;
use blogsync_remote::RemoteSource;
use serde::Serialize;
use std::io::Write;

/// Refresh result.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RefreshResult {
    /// Users fetched.
    pub users: usize,
    /// Comments fetched.
    pub comments: usize,
    /// Posts fetched for the first page.
    pub posts: usize,
}

/// Runs the refresh command.
///
/// Every collection is refetched; the write-backs finish before the process
/// exits.
pub async fn run<R, W>(
    repo: &BlogRepository<R>,
    page_size: u32,
    format: OutputFormat,
    out: &mut W,
) -> CommandResult<()>
where
    R: RemoteSource,
    W: Write,
{
    let (users, comments, posts) = repo.refresh_all(page_size).await?;
    let result = RefreshResult {
        users,
        comments,
        posts,
    };
    tracing::info!(users, comments, posts, "refreshed from remote");

    match format {
        OutputFormat::Text => writeln!(
            out,
            "Refreshed {} users, {} comments, {} posts",
            result.users, result.comments, result.posts
        )?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &result)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

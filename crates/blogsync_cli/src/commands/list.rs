//! Users and comments command implementations.

use super::{write_records, CommandResult, OutputFormat};
use blogsync_engine::BlogRepository;
use blogsync_model::EntityId;
use blogsync_remote::RemoteSource;
use std::io::Write;

/// Runs the users command.
pub async fn users<R, W>(
    repo: &BlogRepository<R>,
    format: OutputFormat,
    out: &mut W,
) -> CommandResult<()>
where
    R: RemoteSource,
    W: Write,
{
    let users = repo.get_users(false).await?;
    write_records(&users, format, out)
}

/// Runs the comments command, optionally for a single post.
pub async fn comments<R, W>(
    repo: &BlogRepository<R>,
    post: Option<EntityId>,
    format: OutputFormat,
    out: &mut W,
) -> CommandResult<()>
where
    R: RemoteSource,
    W: Write,
{
    let mut comments = repo.get_comments(false).await?;
    if let Some(post) = post {
        comments.retain(|comment| comment.post_id == post);
    }
    write_records(&comments, format, out)
}

//! Post detail command implementation.

use super::{CommandError, CommandResult, Describe, OutputFormat};
use blogsync_engine::{BlogRepository, PostDetail};
use blogsync_model::{Comment, EntityId, Post, User};
use blogsync_remote::RemoteSource;
use serde::Serialize;
use std::io::Write;

/// JSON form of a post detail.
#[derive(Debug, Serialize)]
struct DetailView<'a> {
    post: &'a Post,
    author: Option<&'a User>,
    comments: &'a [Comment],
}

/// Runs the post command.
pub async fn run<R, W>(
    repo: &BlogRepository<R>,
    id: EntityId,
    format: OutputFormat,
    out: &mut W,
) -> CommandResult<()>
where
    R: RemoteSource,
    W: Write,
{
    let detail = repo
        .post_detail(id)
        .await?
        .ok_or(CommandError::NotCached(id))?;

    match format {
        OutputFormat::Text => write_text(&detail, out)?,
        OutputFormat::Json => {
            let view = DetailView {
                post: &detail.post,
                author: detail.author.as_ref(),
                comments: &detail.comments,
            };
            serde_json::to_writer_pretty(&mut *out, &view)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(detail: &PostDetail, out: &mut W) -> std::io::Result<()> {
    let post = &detail.post;
    writeln!(out, "{}", post.title)?;
    match &detail.author {
        Some(author) => writeln!(out, "by {} (@{})", author.name, author.username)?,
        None => writeln!(out, "by unknown author (user {})", post.user_id)?,
    }
    writeln!(out)?;
    writeln!(out, "{}", post.body)?;
    writeln!(out)?;
    writeln!(out, "Comments ({}):", detail.comments.len())?;
    for comment in &detail.comments {
        comment.describe(out)?;
        writeln!(out)?;
    }
    Ok(())
}

//! CLI command implementations.

pub mod list;
pub mod post;
pub mod posts;
pub mod refresh;

use blogsync_engine::SyncError;
use blogsync_model::{Comment, EntityId, Post, User};
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

/// Output format of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per record.
    Text,
    /// JSON documents.
    Json,
}

/// Errors reported by a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The post has not been cached yet.
    #[error("post {0} is not cached; run `blogsync posts` first")]
    NotCached(EntityId),

    /// One or more page loads failed.
    #[error("could not load posts ({0} failed loads)")]
    LoadFailed(usize),

    /// Reading or fetching a collection failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Writing output failed.
    #[error("output error: {0}")]
    Io(#[from] io::Error),

    /// Encoding JSON output failed.
    #[error("output error: {0}")]
    Json(#[from] serde_json::Error),

    /// A background load did not complete.
    #[error("load task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for commands.
pub type CommandResult<T> = Result<T, CommandError>;

/// A record with a one-line text form.
pub trait Describe {
    /// Writes the text form, without a newline.
    fn describe(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl Describe for Post {
    fn describe(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "#{:<4} {} (user {})", self.id, self.title, self.user_id)
    }
}

impl Describe for User {
    fn describe(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(
            out,
            "#{:<4} {} (@{}) <{}>",
            self.id, self.name, self.username, self.email
        )
    }
}

impl Describe for Comment {
    fn describe(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(
            out,
            "#{:<4} on post {}: {} <{}>",
            self.id, self.post_id, self.name, self.email
        )
    }
}

/// Writes records in the chosen format.
pub fn write_records<T, W>(records: &[T], format: OutputFormat, out: &mut W) -> CommandResult<()>
where
    T: Describe + Serialize,
    W: Write,
{
    match format {
        OutputFormat::Text => {
            for record in records {
                record.describe(out)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogsync_testkit::{comment, post, user};

    fn render<T: Describe + Serialize>(records: &[T], format: OutputFormat) -> String {
        let mut out = Vec::new();
        write_records(records, format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_lines() {
        assert_eq!(
            render(&[post(1, 2)], OutputFormat::Text),
            "#1    Post 1 (user 2)\n"
        );
        assert_eq!(
            render(&[user(3)], OutputFormat::Text),
            "#3    User 3 (@user3) <user3@example.com>\n"
        );
        assert_eq!(
            render(&[comment(5, 1)], OutputFormat::Text),
            "#5    on post 1: Comment 5 <reader5@example.com>\n"
        );
    }

    #[test]
    fn json_uses_api_field_names() {
        let json = render(&[post(1, 2)], OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["userId"], 2);
        assert_eq!(value[0]["title"], "Post 1");
    }

    #[test]
    fn not_cached_message() {
        let err = CommandError::NotCached(EntityId::new(9));
        assert_eq!(
            err.to_string(),
            "post 9 is not cached; run `blogsync posts` first"
        );
    }
}

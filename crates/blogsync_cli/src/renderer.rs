//! Terminal presentation of posts screen states.

use crate::commands::{Describe, OutputFormat};
use blogsync_engine::{ScreenRenderer, ScreenState, ScrollPosition};
use blogsync_model::{EntityId, Post};
use std::io::{self, Write};

/// Prints screen states to a writer.
///
/// Posts are printed as they arrive. Failed loads print one generic line;
/// the underlying error only goes to the log.
pub struct TerminalRenderer<W: Write> {
    out: W,
    format: OutputFormat,
    shown: usize,
    delivered: Vec<Post>,
    errors: usize,
    last_page: bool,
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            shown: 0,
            delivered: Vec::new(),
            errors: 0,
            last_page: false,
        }
    }

    /// Number of posts printed.
    pub fn shown(&self) -> usize {
        self.shown
    }

    /// Finds a post among those the screen received.
    pub fn delivered(&self, id: EntityId) -> Option<&Post> {
        self.delivered.iter().find(|post| post.id == id)
    }

    /// Number of failed loads.
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Returns true once the last page was reported.
    pub fn reached_last_page(&self) -> bool {
        self.last_page
    }

    /// Position of a list of the printed posts scrolled to its end.
    pub fn scrolled_to_end(&self, visible: usize) -> ScrollPosition {
        let visible_count = visible.min(self.shown);
        ScrollPosition {
            visible_count,
            total_count: self.shown,
            first_visible: (self.shown > 0).then(|| self.shown - visible_count),
        }
    }

    fn write_state(&mut self, state: ScreenState) -> io::Result<()> {
        match state {
            ScreenState::Loading => tracing::debug!("loading posts"),
            ScreenState::DataAvailable(posts) => {
                self.shown += posts.len();
                match self.format {
                    OutputFormat::Text => {
                        for post in &posts {
                            post.describe(&mut self.out)?;
                            writeln!(self.out)?;
                        }
                    }
                    OutputFormat::Json => {
                        serde_json::to_writer(&mut self.out, &posts)?;
                        writeln!(self.out)?;
                    }
                }
                self.delivered.extend(posts);
            }
            ScreenState::FinishedLoading { last_page } => {
                self.last_page = last_page;
                if last_page && self.format == OutputFormat::Text {
                    writeln!(self.out, "-- no more posts --")?;
                }
            }
            ScreenState::Error(e) => {
                self.errors += 1;
                tracing::debug!(error = %e, "load failed");
                writeln!(self.out, "Could not load posts. Please try again later.")?;
            }
            ScreenState::ItemSelected(post) => {
                tracing::debug!(post = %post.id, "post selected");
                if self.format == OutputFormat::Text {
                    writeln!(self.out, "Opening post #{}", post.id)?;
                }
            }
        }
        Ok(())
    }
}

impl<W: Write> ScreenRenderer for TerminalRenderer<W> {
    fn render(&mut self, state: ScreenState) {
        if let Err(e) = self.write_state(state) {
            tracing::warn!(error = %e, "cannot write to terminal");
        }
    }
}

//! Screen states and the presentation seam.

use crate::error::SyncError;
use blogsync_model::Post;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// A state the posts screen should render.
///
/// Each load emits `Loading`, then `DataAvailable` or `Error`, then
/// `FinishedLoading`.
#[derive(Debug, Clone)]
pub enum ScreenState {
    /// A load has started.
    Loading,
    /// A page of posts arrived.
    DataAvailable(Vec<Post>),
    /// The load ended.
    FinishedLoading {
        /// No further pages are expected.
        last_page: bool,
    },
    /// The load failed.
    Error(Arc<SyncError>),
    /// The user picked a post.
    ItemSelected(Post),
}

impl ScreenState {
    /// Short name of the state, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ScreenState::Loading => "loading",
            ScreenState::DataAvailable(_) => "data_available",
            ScreenState::FinishedLoading { .. } => "finished_loading",
            ScreenState::Error(_) => "error",
            ScreenState::ItemSelected(_) => "item_selected",
        }
    }
}

/// Sending half of a screen state channel.
pub type ScreenSender = UnboundedSender<ScreenState>;

/// Receiving half of a screen state channel.
pub type ScreenReceiver = UnboundedReceiver<ScreenState>;

/// Presentation adapter for screen states.
///
/// Called on the task that drains the channel, one state at a time.
pub trait ScreenRenderer {
    /// Renders one state.
    fn render(&mut self, state: ScreenState);
}

impl<F: FnMut(ScreenState)> ScreenRenderer for F {
    fn render(&mut self, state: ScreenState) {
        self(state)
    }
}

/// Renders states until every sender is gone.
pub async fn render_loop<R: ScreenRenderer + ?Sized>(mut states: ScreenReceiver, renderer: &mut R) {
    while let Some(state) = states.recv().await {
        renderer.render(state);
    }
}

/// Renders the states already queued without waiting for more.
///
/// Returns the number rendered.
pub fn render_ready<R: ScreenRenderer + ?Sized>(states: &mut ScreenReceiver, renderer: &mut R) -> usize {
    let mut rendered = 0;
    while let Ok(state) = states.try_recv() {
        renderer.render(state);
        rendered += 1;
    }
    rendered
}

//! Pagination controller for the posts screen.
//!
//! The controller owns one [`PageState`] per attached screen. Every load
//! takes a [`LoadTicket`] when it starts and may only replace the state if
//! the ticket is still current when it finishes. A load that lost its
//! ticket (another load started, or the screen detached) is discarded
//! without touching the state or emitting anything.
//!
//! ```text
//! idle ──load_posts──▶ loading(ticket) ──ok(items)──▶ idle(page', last_page')
//!                          │
//!                          └──────────err─────────▶ idle(page, last_page)
//! ```

use crate::config::EngineConfig;
use crate::error::SyncResult;
use crate::repository::PostsSource;
use crate::screen::{ScreenReceiver, ScreenSender, ScreenState};
use blogsync_model::Post;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};

/// Identifies one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// Returns the raw ticket number.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Pagination state of a posts screen.
///
/// Values are immutable; each transition produces a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: u32,
    page_size: u32,
    previous_count: usize,
    loading: Option<LoadTicket>,
    last_page: bool,
}

impl PageState {
    /// Initial state: page 1, nothing loaded.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            previous_count: 0,
            loading: None,
            last_page: false,
        }
    }

    /// Next page to request. Always at least 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Posts requested per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Items returned by the most recent successful load.
    pub fn previous_count(&self) -> usize {
        self.previous_count
    }

    /// Ticket of the load in flight, if any.
    pub fn loading(&self) -> Option<LoadTicket> {
        self.loading
    }

    /// Returns true while a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Returns true once an empty page was returned past the first page.
    pub fn is_last_page(&self) -> bool {
        self.last_page
    }

    /// Returns true if another page may be requested.
    pub fn can_load_more(&self) -> bool {
        !self.is_loading() && !self.last_page
    }

    /// A load started.
    #[must_use]
    pub fn begin(self, ticket: LoadTicket) -> Self {
        Self {
            loading: Some(ticket),
            ..self
        }
    }

    /// A load returned `count` items.
    ///
    /// The page only moves on a non-empty result: one page forward for a
    /// load-more, otherwise to the page after the items already shown. The
    /// last-page flag is computed against the resulting page.
    #[must_use]
    pub fn succeeded(self, count: usize, load_more: bool) -> Self {
        let page = if count == 0 {
            self.page
        } else if load_more {
            self.page.saturating_add(1)
        } else {
            let full_pages = count / self.page_size as usize;
            u32::try_from(full_pages).map_or(u32::MAX, |p| p.saturating_add(1))
        };
        Self {
            page,
            previous_count: count,
            loading: None,
            last_page: page > 1 && count == 0,
            ..self
        }
    }

    /// A load failed. Only the loading flag changes.
    #[must_use]
    pub fn failed(self) -> Self {
        Self {
            loading: None,
            ..self
        }
    }
}

/// Position of a scrolled list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    /// Number of rows on screen.
    pub visible_count: usize,
    /// Total rows in the list.
    pub total_count: usize,
    /// Index of the first row on screen, if any row is shown.
    pub first_visible: Option<usize>,
}

impl ScrollPosition {
    /// Returns true if the last row is on screen.
    pub fn reached_end(&self) -> bool {
        match self.first_visible {
            Some(first) => self.visible_count + first >= self.total_count,
            None => false,
        }
    }
}

struct Shared<S> {
    source: Arc<S>,
    state: Mutex<PageState>,
    screen: ScreenSender,
    next_ticket: AtomicU64,
    detached: AtomicBool,
}

impl<S: PostsSource> Shared<S> {
    fn emit(&self, state: ScreenState) {
        let name = state.name();
        if self.screen.send(state).is_err() {
            tracing::trace!(state = name, "screen receiver dropped");
        }
    }

    /// Starts a load. Returns the ticket and the page to request, or `None`
    /// once detached.
    fn begin(&self) -> Option<(LoadTicket, u32, u32)> {
        let mut state = self.state.lock();
        if self.detached.load(Ordering::SeqCst) {
            return None;
        }
        let ticket = LoadTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst));
        if let Some(previous) = state.loading {
            tracing::warn!(
                previous = previous.as_u64(),
                ticket = ticket.as_u64(),
                "load started while another is in flight"
            );
        }
        self.emit(ScreenState::Loading);
        *state = state.begin(ticket);
        tracing::debug!(ticket = ticket.as_u64(), page = state.page, "load started");
        Some((ticket, state.page, state.page_size))
    }

    /// Applies the outcome of a load if its ticket is still current.
    fn finish(&self, ticket: LoadTicket, load_more: bool, result: SyncResult<Vec<Post>>) {
        let mut state = self.state.lock();
        if self.detached.load(Ordering::SeqCst) {
            tracing::debug!(ticket = ticket.as_u64(), "load finished after detach");
            return;
        }
        if state.loading != Some(ticket) {
            tracing::warn!(
                ticket = ticket.as_u64(),
                current = ?state.loading.map(LoadTicket::as_u64),
                "discarding stale load"
            );
            return;
        }

        match result {
            Ok(items) => {
                let next = state.succeeded(items.len(), load_more);
                tracing::debug!(
                    items = items.len(),
                    page = next.page,
                    last_page = next.last_page,
                    "load succeeded"
                );
                *state = next;
                self.emit(ScreenState::DataAvailable(items));
                self.emit(ScreenState::FinishedLoading {
                    last_page: next.last_page,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "load failed");
                *state = state.failed();
                self.emit(ScreenState::Error(Arc::new(e)));
                self.emit(ScreenState::FinishedLoading {
                    last_page: state.last_page,
                });
            }
        }
    }

    /// Clears a load that was dropped before it finished.
    fn cancel(&self, ticket: LoadTicket) {
        let mut state = self.state.lock();
        if self.detached.load(Ordering::SeqCst) || state.loading != Some(ticket) {
            return;
        }
        tracing::debug!(ticket = ticket.as_u64(), "load cancelled");
        *state = state.failed();
        self.emit(ScreenState::FinishedLoading {
            last_page: state.last_page,
        });
    }

    async fn run(&self, ticket: LoadTicket, page: u32, limit: u32, load_more: bool) {
        let mut pending = PendingLoad {
            shared: self,
            ticket: Some(ticket),
        };
        let result = self.source.posts(page, limit, load_more).await;
        pending.ticket = None;
        self.finish(ticket, load_more, result);
    }
}

/// Cancels its load if dropped before the source answered.
struct PendingLoad<'a, S: PostsSource> {
    shared: &'a Shared<S>,
    ticket: Option<LoadTicket>,
}

impl<S: PostsSource> Drop for PendingLoad<'_, S> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.shared.cancel(ticket);
        }
    }
}

/// Drives paginated loading of posts for one screen.
///
/// States are emitted on the channel returned by [`PostsController::attach`]
/// and should be drained with [`crate::render_loop`] on the presentation
/// task. Dropping the controller detaches it.
pub struct PostsController<S: PostsSource> {
    shared: Arc<Shared<S>>,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl<S: PostsSource> PostsController<S> {
    /// Attaches a controller to a screen.
    ///
    /// Returns the controller and the receiving end of its state channel.
    pub fn attach(source: Arc<S>, config: &EngineConfig) -> (Self, ScreenReceiver) {
        let (screen, states) = mpsc::unbounded_channel();
        let controller = Self {
            shared: Arc::new(Shared {
                source,
                state: Mutex::new(PageState::new(config.page_size)),
                screen,
                next_ticket: AtomicU64::new(1),
                detached: AtomicBool::new(false),
            }),
            tasks: Mutex::new(Vec::new()),
        };
        (controller, states)
    }

    /// Returns a snapshot of the page state.
    pub fn state(&self) -> PageState {
        *self.shared.state.lock()
    }

    /// Returns true if a scroll to the end should load another page.
    pub fn can_load_more(&self) -> bool {
        self.state().can_load_more()
    }

    /// Returns true once [`detach`](Self::detach) was called.
    pub fn is_detached(&self) -> bool {
        self.shared.detached.load(Ordering::SeqCst)
    }

    /// Starts the initial load.
    pub fn bind(&self) -> Option<JoinHandle<()>> {
        self.load_posts(false)
    }

    /// Starts a load in the background.
    ///
    /// `Loading` is emitted before this returns. Returns `None` once
    /// detached.
    pub fn load_posts(&self, load_more: bool) -> Option<JoinHandle<()>> {
        let (ticket, page, limit) = self.shared.begin()?;
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            shared.run(ticket, page, limit, load_more).await;
        });

        let mut tasks = self.tasks.lock();
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle.abort_handle());
        Some(handle)
    }

    /// Loads a page and waits for it.
    ///
    /// Same transitions and emissions as [`load_posts`](Self::load_posts).
    /// Dropping the future before it completes ends the load as if it had
    /// failed, without an `Error` state.
    pub async fn load(&self, load_more: bool) {
        if let Some((ticket, page, limit)) = self.shared.begin() {
            self.shared.run(ticket, page, limit, load_more).await;
        }
    }

    /// Reports that the user picked a post.
    pub fn select_post(&self, post: Post) {
        if self.is_detached() {
            return;
        }
        self.shared.emit(ScreenState::ItemSelected(post));
    }

    /// Reports a scroll. Loads the next page when the end of the list is
    /// on screen and no load is blocking.
    pub fn on_scrolled(&self, position: ScrollPosition) -> Option<JoinHandle<()>> {
        if !self.can_load_more() || !position.reached_end() {
            return None;
        }
        self.load_posts(true)
    }

    /// Detaches the screen.
    ///
    /// Outstanding loads are aborted and any completion still racing is
    /// ignored. Write-backs already spawned by the repository keep running.
    pub fn detach(&self) {
        {
            let _state = self.shared.state.lock();
            if self.shared.detached.swap(true, Ordering::SeqCst) {
                return;
            }
        }
        let tasks = std::mem::take(&mut *self.tasks.lock());
        tracing::debug!(tasks = tasks.len(), "detaching posts screen");
        for task in tasks {
            task.abort();
        }
    }
}

impl<S: PostsSource> Drop for PostsController<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(n: u64) -> LoadTicket {
        LoadTicket(n)
    }

    #[test]
    fn initial_state() {
        let state = PageState::new(20);
        assert_eq!(state.page(), 1);
        assert_eq!(state.previous_count(), 0);
        assert!(!state.is_loading());
        assert!(!state.is_last_page());
        assert!(state.can_load_more());
    }

    #[test]
    fn initial_load_aligns_page_with_cached_items() {
        let state = PageState::new(20).begin(ticket(1)).succeeded(45, false);
        assert_eq!(state.page(), 3);
        assert_eq!(state.previous_count(), 45);
        assert!(!state.is_last_page());
        assert!(!state.is_loading());
    }

    #[test]
    fn load_more_advances_one_page() {
        let state = PageState::new(20)
            .begin(ticket(1))
            .succeeded(20, false)
            .begin(ticket(2))
            .succeeded(20, true);
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn empty_page_after_first_is_last() {
        let state = PageState::new(20)
            .begin(ticket(1))
            .succeeded(20, false)
            .begin(ticket(2))
            .succeeded(0, true);
        assert_eq!(state.page(), 2);
        assert!(state.is_last_page());
        assert!(!state.can_load_more());
    }

    #[test]
    fn empty_first_page_is_not_last() {
        let state = PageState::new(20).begin(ticket(1)).succeeded(0, false);
        assert_eq!(state.page(), 1);
        assert!(!state.is_last_page());
    }

    #[test]
    fn failure_only_clears_loading() {
        let before = PageState::new(20).begin(ticket(1)).succeeded(20, false);
        let after = before.begin(ticket(2)).failed();
        assert_eq!(after, before);
    }

    #[test]
    fn loading_blocks_load_more() {
        let state = PageState::new(20).begin(ticket(1));
        assert!(!state.can_load_more());
    }

    #[test]
    fn zero_page_size_is_raised() {
        assert_eq!(PageState::new(0).page_size(), 1);
    }

    #[test]
    fn scroll_reached_end() {
        let at_end = ScrollPosition {
            visible_count: 5,
            total_count: 20,
            first_visible: Some(15),
        };
        let middle = ScrollPosition {
            first_visible: Some(3),
            ..at_end
        };
        let empty = ScrollPosition {
            visible_count: 0,
            total_count: 0,
            first_visible: None,
        };

        assert!(at_end.reached_end());
        assert!(!middle.reached_end());
        assert!(!empty.reached_end());
    }
}

//! # blogsync engine
//!
//! Local-first data layer for a blog reader.
//!
//! This crate provides:
//! - [`SyncPolicy`], which serves a collection from the local store and
//!   falls back to the remote source, writing remote results back in a
//!   detached task
//! - [`BlogRepository`], the policy bound to users, comments and posts
//! - [`PostsController`], the pagination state machine of the posts screen
//! - [`ScreenState`] and [`ScreenRenderer`], the presentation seam
//!
//! ## Flow
//!
//! ```text
//! ScreenRenderer ◀── render_loop ◀── PostsController
//!                                         │ posts(page, limit, load_more)
//!                                         ▼
//!                                   BlogRepository
//!                                         │ resolve
//!                                         ▼
//!                     LocalStore ◀── SyncPolicy ──▶ RemoteSource
//!                                         │
//!                                         ▼
//!                                   WriteBackFeed
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blogsync_engine::{BlogRepository, EngineConfig, LocalStores, PostsController, SyncPolicy};
//! use blogsync_remote::MockRemoteSource;
//!
//! # async fn demo() {
//! let repo = Arc::new(BlogRepository::new(
//!     MockRemoteSource::new(),
//!     LocalStores::in_memory(),
//!     SyncPolicy::new(),
//! ));
//! let (controller, mut states) = PostsController::attach(repo, &EngineConfig::default());
//! controller.load(false).await;
//! while let Ok(state) = states.try_recv() {
//!     println!("{}", state.name());
//! }
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod policy;
mod repository;
mod screen;
mod write_back;

pub use config::{EngineConfig, DEFAULT_PAGE_SIZE};
pub use controller::{LoadTicket, PageState, PostsController, ScrollPosition};
pub use error::{SyncError, SyncResult};
pub use policy::SyncPolicy;
pub use repository::{BlogRepository, LocalStores, PostDetail, PostsSource};
pub use screen::{
    render_loop, render_ready, ScreenReceiver, ScreenRenderer, ScreenSender, ScreenState,
};
pub use write_back::{WriteBackEvent, WriteBackFeed, WriteBackOutcome};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

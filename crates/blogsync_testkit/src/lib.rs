//! # blogsync testkit
//!
//! Test utilities for blogsync.
//!
//! This crate provides:
//! - Entity builders and seeded repositories
//! - Stores that fail on demand
//! - A scripted, gateable posts source for controller tests
//! - A renderer that records screen states
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blogsync_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn reads_through() {
//!     let fixture = TestRepository::in_memory();
//!     fixture.remote.set_posts(posts(1..=45));
//!     let page = fixture.repo.get_posts(1, 20, false).await.unwrap();
//!     assert_eq!(page.len(), 20);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;

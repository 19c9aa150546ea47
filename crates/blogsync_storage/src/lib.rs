//! # blogsync storage
//!
//! Local store trait and implementations for blogsync.
//!
//! This crate provides the cache side of the local-first data layer. A store
//! holds one collection of entities keyed by [`EntityId`] and knows nothing
//! about when it is read or refreshed; that policy lives in the engine.
//!
//! ## Design Principles
//!
//! - Stores are simple keyed record sets (read all, upsert, get by id)
//! - Inserts upsert by entity id; duplicates never accumulate
//! - `get_all` returns records in ascending id order
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral runs
//! - [`JsonFileStore`] - One JSON file per collection
//!
//! ## Example
//!
//! ```rust
//! use blogsync_model::{EntityId, Post};
//! use blogsync_storage::{InMemoryStore, LocalStore};
//!
//! let store = InMemoryStore::new();
//! let post = Post {
//!     id: EntityId::new(1),
//!     user_id: EntityId::new(1),
//!     title: "hello".into(),
//!     body: "world".into(),
//! };
//! store.insert_all(&[post.clone()]).unwrap();
//! assert_eq!(store.get(EntityId::new(1)).unwrap(), Some(post));
//! ```
//!
//! [`EntityId`]: blogsync_model::EntityId

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use store::LocalStore;

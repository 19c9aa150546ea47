//! Local store trait definition.

use crate::error::StorageResult;
use blogsync_model::{Entity, EntityId};

/// A local cache of one entity collection.
///
/// Stores are **keyed record sets**. They provide simple operations for
/// reading the whole collection, upserting a batch and looking up a single
/// record. Whether to serve from the store or refresh it is decided by the
/// engine, never by the store.
///
/// # Invariants
///
/// - `get_all` returns every stored record in ascending id order
/// - `insert_all` replaces records whose id is already present
/// - `get` sees every record written by a completed `insert_all`
/// - Stores must be `Send + Sync`; concurrent readers and writers are allowed
///   but no transactional isolation is promised
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::JsonFileStore`] - For persistent storage
pub trait LocalStore<T: Entity>: Send + Sync {
    /// Returns all cached records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_all(&self) -> StorageResult<Vec<T>>;

    /// Upserts a batch of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be persisted. A failed batch
    /// leaves previously stored records readable.
    fn insert_all(&self, records: &[T]) -> StorageResult<()>;

    /// Looks up a single record by id.
    ///
    /// Returns `None` if no record with that id is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, id: EntityId) -> StorageResult<Option<T>>;
}

impl<T: Entity, S: LocalStore<T> + ?Sized> LocalStore<T> for std::sync::Arc<S> {
    fn get_all(&self) -> StorageResult<Vec<T>> {
        (**self).get_all()
    }

    fn insert_all(&self, records: &[T]) -> StorageResult<()> {
        (**self).insert_all(records)
    }

    fn get(&self, id: EntityId) -> StorageResult<Option<T>> {
        (**self).get(id)
    }
}

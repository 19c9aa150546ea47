//! In-memory local store for testing.

use crate::error::StorageResult;
use crate::store::LocalStore;
use blogsync_model::{Entity, EntityId};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory local store.
///
/// This store keeps all records in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral runs that don't need a cache across restarts
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    records: RwLock<BTreeMap<EntityId, T>>,
}

impl<T: Entity> InMemoryStore<T> {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates a store with pre-existing records.
    ///
    /// Useful for testing cache-hit scenarios.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.entity_id(), r)).collect()),
        }
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Removes all records.
    pub fn clear(&self) {
        self.records.write().clear();
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> LocalStore<T> for InMemoryStore<T> {
    fn get_all(&self) -> StorageResult<Vec<T>> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn insert_all(&self, records: &[T]) -> StorageResult<()> {
        let mut stored = self.records.write();
        for record in records {
            stored.insert(record.entity_id(), record.clone());
        }
        Ok(())
    }

    fn get(&self, id: EntityId) -> StorageResult<Option<T>> {
        Ok(self.records.read().get(&id).cloned())
    }
}

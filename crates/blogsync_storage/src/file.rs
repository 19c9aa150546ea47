//! JSON-file local store for persistent caching.

use crate::error::{StorageError, StorageResult};
use crate::store::LocalStore;
use blogsync_model::{Entity, EntityId};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A local store backed by one JSON file per collection.
///
/// The file holds a JSON array of records in ascending id order. It is read
/// once on open and rewritten on every `insert_all`. Records survive process
/// restarts.
///
/// # Durability
///
/// Writes go to a sibling `.tmp` file which is synced and then renamed over
/// the collection file, so a crash mid-write leaves the previous contents.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
/// Internal locking serializes writers.
///
/// # Example
///
/// ```no_run
/// use blogsync_model::Post;
/// use blogsync_storage::{JsonFileStore, LocalStore};
/// use std::path::Path;
///
/// let store: JsonFileStore<Post> = JsonFileStore::open_in(Path::new("cache")).unwrap();
/// let cached = store.get_all().unwrap();
/// ```
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    records: RwLock<BTreeMap<EntityId, T>>,
}

impl<T> JsonFileStore<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    /// Opens or creates a store at the given file path.
    ///
    /// A missing file is treated as an empty collection; it is created on
    /// the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let records = match File::open(path) {
            Ok(file) => {
                let list: Vec<T> = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                    StorageError::Corrupted {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    }
                })?;
                list.into_iter().map(|r| (r.entity_id(), r)).collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            collection = %T::COLLECTION,
            path = %path.display(),
            records = records.len(),
            "opened json store"
        );

        Ok(Self {
            path: path.to_path_buf(),
            records: RwLock::new(records),
        })
    }

    /// Opens the store for `T`'s collection inside `dir`, creating the
    /// directory if needed.
    ///
    /// The file is named after the collection (`posts.json`, ...).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be read.
    pub fn open_in(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Self::open(&dir.join(format!("{}.json", T::COLLECTION.name())))
    }

    /// Returns the path to the collection file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, records: &BTreeMap<EntityId, T>) -> StorageResult<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            let list: Vec<&T> = records.values().collect();
            serde_json::to_writer(&mut writer, &list)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl<T> LocalStore<T> for JsonFileStore<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    fn get_all(&self) -> StorageResult<Vec<T>> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn insert_all(&self, records: &[T]) -> StorageResult<()> {
        let mut stored = self.records.write();
        let mut next = stored.clone();
        for record in records {
            next.insert(record.entity_id(), record.clone());
        }

        // Only publish the new set once it is on disk.
        self.write_file(&next)?;
        *stored = next;
        Ok(())
    }

    fn get(&self, id: EntityId) -> StorageResult<Option<T>> {
        Ok(self.records.read().get(&id).cloned())
    }
}

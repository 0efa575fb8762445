//! Local block storage trait.
//!
//! The [`Datastore`] trait abstracts over storage backends so the block
//! service can run over redb on disk or a plain map in memory.

use std::collections::HashMap;

use lodestone_primitives::DatastoreKey;
use parking_lot::RwLock;

use crate::DatastoreError;

/// Local block storage backend.
///
/// Values are raw block bytes stored under a [`DatastoreKey`]. Implementations
/// must be thread-safe; the block service shares one instance between all
/// concurrent callers.
pub trait Datastore: Send + Sync {
    /// Store `data` under `key`, replacing any previous value.
    fn put(&self, key: &DatastoreKey, data: &[u8]) -> Result<(), DatastoreError>;

    /// Get the value stored under `key`.
    ///
    /// Returns `None` if nothing is stored there. Any `Err` means the backend
    /// itself failed.
    fn get(&self, key: &DatastoreKey) -> Result<Option<Vec<u8>>, DatastoreError>;

    /// Check if a value is stored under `key`.
    fn contains(&self, key: &DatastoreKey) -> Result<bool, DatastoreError>;

    /// Remove the value under `key`.
    ///
    /// Returns `Ok(())` even if nothing was stored.
    fn delete(&self, key: &DatastoreKey) -> Result<(), DatastoreError>;

    /// Every key currently stored.
    fn keys(&self) -> Result<Vec<DatastoreKey>, DatastoreError>;
}

/// In-memory datastore, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    values: RwLock<HashMap<DatastoreKey, Vec<u8>>>,
}

impl MemoryDatastore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl Datastore for MemoryDatastore {
    fn put(&self, key: &DatastoreKey, data: &[u8]) -> Result<(), DatastoreError> {
        self.values.write().insert(key.clone(), data.to_vec());
        Ok(())
    }

    fn get(&self, key: &DatastoreKey) -> Result<Option<Vec<u8>>, DatastoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn contains(&self, key: &DatastoreKey) -> Result<bool, DatastoreError> {
        Ok(self.values.read().contains_key(key))
    }

    fn delete(&self, key: &DatastoreKey) -> Result<(), DatastoreError> {
        self.values.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<DatastoreKey>, DatastoreError> {
        Ok(self.values.read().keys().cloned().collect())
    }
}

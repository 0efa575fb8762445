//! redb-based block storage backend.
//!
//! This module provides [`RedbDatastore`], a persistent datastore
//! backed by the redb embedded database.

use std::path::Path;

use lodestone_primitives::DatastoreKey;
use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::{Datastore, DatastoreError};

/// Table definition for blocks.
/// Key: storage key string (`/blocks/<hex>`)
/// Value: block data bytes
const BLOCKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("blocks");

/// redb-based datastore.
///
/// Every write is its own committed transaction. Safe to share between
/// threads.
pub struct RedbDatastore {
    db: Database,
}

impl RedbDatastore {
    /// Open or create a datastore at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatastoreError> {
        let db = Database::create(path.as_ref())?;

        // Ensure the blocks table exists
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(BLOCKS_TABLE)?;
        }
        write_txn.commit()?;

        debug!(path = %path.as_ref().display(), "Opened redb datastore");
        Ok(Self { db })
    }
}

impl std::fmt::Debug for RedbDatastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbDatastore").finish_non_exhaustive()
    }
}

impl Datastore for RedbDatastore {
    fn put(&self, key: &DatastoreKey, data: &[u8]) -> Result<(), DatastoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(BLOCKS_TABLE)?;
            table.insert(key.as_str(), data)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get(&self, key: &DatastoreKey) -> Result<Option<Vec<u8>>, DatastoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BLOCKS_TABLE)?;
        Ok(table.get(key.as_str())?.map(|value| value.value().to_vec()))
    }

    fn contains(&self, key: &DatastoreKey) -> Result<bool, DatastoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BLOCKS_TABLE)?;
        Ok(table.get(key.as_str())?.is_some())
    }

    fn delete(&self, key: &DatastoreKey) -> Result<(), DatastoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(BLOCKS_TABLE)?;
            table.remove(key.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<DatastoreKey>, DatastoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BLOCKS_TABLE)?;

        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            keys.push(DatastoreKey::from_raw(key.value()));
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_primitives::Key;
    use tempfile::tempdir;

    fn storage_key(n: u8) -> DatastoreKey {
        Key::new([n; 32]).storage_key()
    }

    #[test]
    fn test_put_get() {
        let dir = tempdir().unwrap();
        let store = RedbDatastore::open(dir.path().join("blocks.redb")).unwrap();

        let key = storage_key(1);
        assert_eq!(store.get(&key).unwrap(), None);

        store.put(&key, b"hello world").unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(b"hello world".to_vec()));
    }

    #[test]
    fn test_contains_and_delete() {
        let dir = tempdir().unwrap();
        let store = RedbDatastore::open(dir.path().join("blocks.redb")).unwrap();

        let key = storage_key(2);
        assert!(!store.contains(&key).unwrap());

        store.put(&key, b"data").unwrap();
        assert!(store.contains(&key).unwrap());

        store.delete(&key).unwrap();
        assert!(!store.contains(&key).unwrap());
    }

    #[test]
    fn test_put_overwrites() {
        let dir = tempdir().unwrap();
        let store = RedbDatastore::open(dir.path().join("blocks.redb")).unwrap();

        let key = storage_key(3);
        store.put(&key, b"first").unwrap();
        store.put(&key, b"second").unwrap();

        assert_eq!(store.get(&key).unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn test_keys_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.redb");

        {
            let store = RedbDatastore::open(&path).unwrap();
            for n in 0..3 {
                store.put(&storage_key(n), b"data").unwrap();
            }
        }

        let store = RedbDatastore::open(&path).unwrap();
        let mut keys = store.keys().unwrap();
        keys.sort();

        let mut expected: Vec<_> = (0..3).map(storage_key).collect();
        expected.sort();
        assert_eq!(keys, expected);
    }
}

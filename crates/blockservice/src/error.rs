//! Block service error types.

use lodestone_primitives::Key;

use crate::ExchangeError;

/// Errors from a [`Datastore`](crate::Datastore) backend.
#[derive(Debug, thiserror::Error)]
pub enum DatastoreError {
    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// The backend refused the operation.
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
}

impl From<redb::DatabaseError> for DatastoreError {
    fn from(err: redb::DatabaseError) -> Self {
        DatastoreError::Database(err.to_string())
    }
}

impl From<redb::TransactionError> for DatastoreError {
    fn from(err: redb::TransactionError) -> Self {
        DatastoreError::Database(err.to_string())
    }
}

impl From<redb::TableError> for DatastoreError {
    fn from(err: redb::TableError) -> Self {
        DatastoreError::Database(err.to_string())
    }
}

impl From<redb::StorageError> for DatastoreError {
    fn from(err: redb::StorageError) -> Self {
        DatastoreError::Database(err.to_string())
    }
}

impl From<redb::CommitError> for DatastoreError {
    fn from(err: redb::CommitError) -> Self {
        DatastoreError::Database(err.to_string())
    }
}

/// Errors from [`BlockService`](crate::BlockService) operations.
#[derive(Debug, thiserror::Error)]
pub enum BlockServiceError {
    /// The service was built without a required collaborator.
    #[error("block service misconfigured: {0}")]
    Config(&'static str),

    /// The local datastore failed.
    #[error("datastore error: {0}")]
    Store(#[from] DatastoreError),

    /// The block was stored locally but announcing it failed.
    #[error("stored {key} but failed to announce it: {source}")]
    Announce {
        /// Key of the block that is now stored locally.
        key: Key,
        /// Why the announcement failed.
        #[source]
        source: ExchangeError,
    },

    /// Fetching from the network failed. Timeouts surface here unchanged.
    #[error("fetch failed: {0}")]
    Fetch(#[source] ExchangeError),

    /// The network returned bytes that do not hash to the requested key.
    #[error("integrity check failed: expected {expected}, got {actual}")]
    Integrity {
        /// The key that was requested.
        expected: Key,
        /// The key the returned data hashes to.
        actual: Key,
    },
}

impl BlockServiceError {
    /// Returns true if this is a fetch that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Fetch(ExchangeError::Timeout { .. }))
    }
}

/// Result type for block service operations.
pub type BlockServiceResult<T> = Result<T, BlockServiceError>;

//! Block service for Lodestone.
//!
//! A [`BlockService`] stores blocks in a local [`Datastore`] and announces
//! them through a network [`Exchange`]. Lookups hit the datastore first and
//! fall back to a single, time-bounded fetch from the exchange.
//!
//! # Backends
//!
//! - [`RedbDatastore`] persists blocks in a redb database file
//! - [`MemoryDatastore`] keeps them in a map, for tests and ephemeral nodes
//!
//! [`OfflineExchange`] connects the service to a local provider registry
//! for nodes without remote peers.

mod args;
mod datastore;
mod error;
mod exchange;
mod metrics;
mod redb_store;
mod service;

pub use args::BlockArgs;
pub use datastore::{Datastore, MemoryDatastore};
pub use error::{BlockServiceError, BlockServiceResult, DatastoreError};
pub use exchange::{Exchange, ExchangeError, OfflineExchange};
pub use redb_store::RedbDatastore;
pub use service::{BlockService, BlockServiceBuilder};

/// Default network fetch deadline, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

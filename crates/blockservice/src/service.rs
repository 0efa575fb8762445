//! The block service: local datastore first, network second.

use std::sync::Arc;
use std::time::Duration;

use lodestone_primitives::{Block, Key};
use tracing::{debug, trace, warn};

use crate::metrics::BlockMetrics;
use crate::{
    BlockServiceError, BlockServiceResult, DEFAULT_FETCH_TIMEOUT_SECS, Datastore, Exchange,
    ExchangeError,
};

/// Resolves keys to blocks and publishes newly stored blocks.
///
/// Cloning is cheap; clones share the same datastore and exchange.
#[derive(Clone)]
pub struct BlockService {
    datastore: Arc<dyn Datastore>,
    exchange: Arc<dyn Exchange>,
    fetch_timeout: Duration,
    metrics: BlockMetrics,
}

impl std::fmt::Debug for BlockService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockService")
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

impl BlockService {
    /// Create a service with the default fetch timeout.
    pub fn new(datastore: Arc<dyn Datastore>, exchange: Arc<dyn Exchange>) -> Self {
        Self {
            datastore,
            exchange,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            metrics: BlockMetrics::default(),
        }
    }

    /// Start building a service.
    pub fn builder() -> BlockServiceBuilder {
        BlockServiceBuilder::default()
    }

    /// Deadline handed to the exchange on a local miss.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Store a block locally and announce it to the network.
    ///
    /// If the store succeeds but the announcement fails, the block stays
    /// stored and [`BlockServiceError::Announce`] carries its key.
    pub async fn put(&self, block: &Block) -> BlockServiceResult<Key> {
        let key = *block.key();
        let storage_key = key.storage_key();

        trace!(%key, size = block.size(), "Storing block");
        self.datastore.put(&storage_key, block.data())?;
        self.metrics.puts_total.increment(1);

        self.exchange
            .announce(&key)
            .await
            .map_err(|source| BlockServiceError::Announce { key, source })?;

        debug!(%key, "Stored and announced block");
        Ok(key)
    }

    /// Get the block for `key`.
    ///
    /// Local hits are returned as stored. On a miss the exchange is asked
    /// exactly once, bounded by the fetch timeout, and the result must hash
    /// to `key`.
    pub async fn get(&self, key: &Key) -> BlockServiceResult<Block> {
        if let Some(data) = self.datastore.get(&key.storage_key())? {
            trace!(%key, "Block found locally");
            self.metrics.local_hits_total.increment(1);
            return Ok(Block::with_key(*key, data));
        }

        let deadline = self.fetch_timeout;
        debug!(%key, ?deadline, "Block not found locally, fetching from network");
        self.metrics.fetches_total.increment(1);

        let fetched = tokio::time::timeout(deadline, self.exchange.fetch(key, deadline))
            .await
            .unwrap_or(Err(ExchangeError::Timeout {
                key: *key,
                deadline,
            }));

        let block = match fetched {
            Ok(block) => block,
            Err(e) => {
                debug!(%key, error = %e, "Fetch failed");
                self.metrics.fetch_failures_total.increment(1);
                return Err(BlockServiceError::Fetch(e));
            }
        };

        let actual = Key::digest(block.data());
        if actual != *key {
            warn!(expected = %key, %actual, "Fetched block failed integrity check");
            self.metrics.integrity_failures_total.increment(1);
            return Err(BlockServiceError::Integrity {
                expected: *key,
                actual,
            });
        }

        Ok(Block::with_key(*key, block.into_data()))
    }

    /// Announce every block already in the datastore.
    ///
    /// Entries whose storage key is not a block key are skipped. Returns the
    /// number of keys announced.
    pub async fn reprovide(&self) -> BlockServiceResult<usize> {
        let mut announced = 0;
        for storage_key in self.datastore.keys()? {
            let key = match storage_key.to_key() {
                Ok(key) => key,
                Err(e) => {
                    warn!(%storage_key, error = %e, "Skipping unrecognised datastore entry");
                    continue;
                }
            };

            self.exchange
                .announce(&key)
                .await
                .map_err(|source| BlockServiceError::Announce { key, source })?;
            announced += 1;
        }

        debug!(announced, "Reprovided stored blocks");
        Ok(announced)
    }
}

/// Builder for [`BlockService`].
///
/// Both a datastore and an exchange are required; [`build`](Self::build)
/// reports whichever is missing.
#[derive(Default)]
pub struct BlockServiceBuilder {
    datastore: Option<Arc<dyn Datastore>>,
    exchange: Option<Arc<dyn Exchange>>,
    fetch_timeout: Option<Duration>,
}

impl BlockServiceBuilder {
    /// Set the local datastore.
    pub fn datastore(mut self, datastore: Arc<dyn Datastore>) -> Self {
        self.datastore = Some(datastore);
        self
    }

    /// Set the network exchange.
    pub fn exchange(mut self, exchange: Arc<dyn Exchange>) -> Self {
        self.exchange = Some(exchange);
        self
    }

    /// Override the network fetch deadline.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Build the service.
    pub fn build(self) -> BlockServiceResult<BlockService> {
        let datastore = self
            .datastore
            .ok_or(BlockServiceError::Config("block service requires a datastore"))?;
        let exchange = self
            .exchange
            .ok_or(BlockServiceError::Config("block service requires an exchange"))?;

        let mut service = BlockService::new(datastore, exchange);
        if let Some(timeout) = self.fetch_timeout {
            service.fetch_timeout = timeout;
        }
        Ok(service)
    }
}

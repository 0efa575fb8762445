//! Network exchange trait and the offline implementation.

use std::time::Duration;

use async_trait::async_trait;
use lodestone_primitives::{Block, Key, Peer, PeerId};
use lodestone_providers::{ProviderError, ProviderHandle};
use tracing::trace;

/// Errors from a network [`Exchange`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// No block arrived before the deadline.
    #[error("timed out fetching {key} after {deadline:?}")]
    Timeout {
        /// The key being fetched.
        key: Key,
        /// The deadline that elapsed.
        deadline: Duration,
    },

    /// The exchange cannot reach any peer that could serve the key.
    #[error("no route to a provider of {0}")]
    Unavailable(Key),

    /// The provider registry could not be reached.
    #[error("provider registry: {0}")]
    Registry(#[from] ProviderError),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),
}

/// The network side of the block service.
///
/// `announce` tells the network this node now holds a key; `fetch` asks the
/// network for a block and must give up once `deadline` has passed.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Advertise that the local node holds `key`.
    async fn announce(&self, key: &Key) -> Result<(), ExchangeError>;

    /// Retrieve the block for `key` from remote peers.
    async fn fetch(&self, key: &Key, deadline: Duration) -> Result<Block, ExchangeError>;
}

/// Exchange for a node with no remote peers.
///
/// Announcements are recorded in the local provider registry under the
/// node's own identity. Fetches always fail with
/// [`ExchangeError::Unavailable`].
#[derive(Debug, Clone)]
pub struct OfflineExchange {
    local: PeerId,
    providers: ProviderHandle,
}

impl OfflineExchange {
    /// Create an offline exchange announcing as `local`.
    pub fn new(local: PeerId, providers: ProviderHandle) -> Self {
        Self { local, providers }
    }

    /// The identity announcements are made under.
    pub fn local(&self) -> &PeerId {
        &self.local
    }
}

#[async_trait]
impl Exchange for OfflineExchange {
    async fn announce(&self, key: &Key) -> Result<(), ExchangeError> {
        trace!(%key, "Announcing to local registry");
        self.providers.add_provider(*key, Peer::new(self.local))?;
        Ok(())
    }

    async fn fetch(&self, key: &Key, _deadline: Duration) -> Result<Block, ExchangeError> {
        Err(ExchangeError::Unavailable(*key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_providers::{ProviderConfig, create_provider_actor};

    #[tokio::test]
    async fn test_announce_records_local_provider() {
        let local = PeerId::random();
        let (service, handle) = create_provider_actor(local, ProviderConfig::default());
        tokio::spawn(service.into_task());

        let exchange = OfflineExchange::new(local, handle.clone());
        let key = Key::digest(b"offline");
        exchange.announce(&key).await.unwrap();

        assert_eq!(handle.get_local().await.unwrap(), vec![key]);
        assert_eq!(
            exchange.fetch(&key, Duration::from_secs(5)).await,
            Err(ExchangeError::Unavailable(key))
        );
    }

    #[tokio::test]
    async fn test_announce_after_halt() {
        let local = PeerId::random();
        let (service, handle) = create_provider_actor(local, ProviderConfig::default());
        drop(service);

        let exchange = OfflineExchange::new(local, handle);
        assert_eq!(
            exchange.announce(&Key::digest(b"x")).await,
            Err(ExchangeError::Registry(ProviderError::ServiceStopped))
        );
    }
}

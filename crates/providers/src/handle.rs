//! Cloneable handle for interacting with the provider service.

use std::time::Duration;

use lodestone_primitives::{Key, Peer};
use tokio::sync::{mpsc, oneshot};

use crate::error::ProviderError;
use crate::service::ProviderCommand;

/// Cloneable handle to a running provider service.
///
/// Every clone talks to the same service. Once the service has stopped all
/// calls return [`ProviderError::ServiceStopped`].
#[derive(Clone, Debug)]
pub struct ProviderHandle {
    command_tx: mpsc::UnboundedSender<ProviderCommand>,
    /// Deadline applied by [`get_providers`](Self::get_providers) and
    /// [`get_local`](Self::get_local).
    request_timeout: Option<Duration>,
}

impl ProviderHandle {
    /// Create a new handle from a command sender.
    pub fn new(
        command_tx: mpsc::UnboundedSender<ProviderCommand>,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self {
            command_tx,
            request_timeout,
        }
    }

    /// Record that `peer` provides `key`. Does not wait for the service to
    /// process the command.
    pub fn add_provider(&self, key: Key, peer: Peer) -> Result<(), ProviderError> {
        self.send(ProviderCommand::AddProvider { key, peer })
    }

    /// Peers on record for `key`, in the order they were added.
    pub async fn get_providers(&self, key: Key) -> Result<Vec<Peer>, ProviderError> {
        self.request(self.request_timeout, |response_tx| {
            ProviderCommand::GetProviders { key, response_tx }
        })
        .await
    }

    /// Like [`get_providers`](Self::get_providers) with an explicit deadline.
    pub async fn get_providers_within(
        &self,
        key: Key,
        deadline: Duration,
    ) -> Result<Vec<Peer>, ProviderError> {
        self.request(Some(deadline), |response_tx| {
            ProviderCommand::GetProviders { key, response_tx }
        })
        .await
    }

    /// Keys the local peer provides, in no particular order.
    pub async fn get_local(&self) -> Result<Vec<Key>, ProviderError> {
        self.request(self.request_timeout, |response_tx| {
            ProviderCommand::GetLocal { response_tx }
        })
        .await
    }

    /// Like [`get_local`](Self::get_local) with an explicit deadline.
    pub async fn get_local_within(&self, deadline: Duration) -> Result<Vec<Key>, ProviderError> {
        self.request(Some(deadline), |response_tx| ProviderCommand::GetLocal {
            response_tx,
        })
        .await
    }

    /// Ask the service to stop. Commands queued behind the halt are dropped.
    pub fn halt(&self) -> Result<(), ProviderError> {
        self.send(ProviderCommand::Halt)
    }

    /// Returns true once the service has stopped receiving commands.
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    fn send(&self, cmd: ProviderCommand) -> Result<(), ProviderError> {
        self.command_tx
            .send(cmd)
            .map_err(|_| ProviderError::ServiceStopped)
    }

    async fn request<T>(
        &self,
        deadline: Option<Duration>,
        command: impl FnOnce(oneshot::Sender<T>) -> ProviderCommand,
    ) -> Result<T, ProviderError> {
        let (tx, rx) = oneshot::channel();
        self.send(command(tx))?;

        match deadline {
            Some(deadline) => tokio::time::timeout(deadline, rx)
                .await
                .map_err(|_| ProviderError::Timeout(deadline))?
                .map_err(|_| ProviderError::ServiceStopped),
            None => rx.await.map_err(|_| ProviderError::ServiceStopped),
        }
    }
}

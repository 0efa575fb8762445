//! Provider registry: which peers claim to hold which content keys.
//!
//! Announcements are kept for a bounded time. A periodic sweep drops every
//! record older than the retention window, so a peer that stops announcing
//! a key eventually disappears from its provider list.
//!
//! # Actor Pattern
//!
//! This crate implements the Handle+Service actor pattern:
//! - [`ProviderService`] runs in its own tokio task, owns the
//!   [`ProviderTable`] and processes commands and sweep ticks one at a time
//! - [`ProviderHandle`] is cheap-to-clone and used to send commands
//!
//! Use [`create_provider_actor`] to create the service and handle pair.
//!
//! ```ignore
//! let (service, handle) = create_provider_actor(local, ProviderConfig::default());
//! tokio::spawn(service.into_task());
//!
//! handle.add_provider(key, peer)?;
//! let peers = handle.get_providers(key).await?;
//! ```

mod args;
mod config;
mod error;
mod handle;
mod metrics;
mod service;
mod table;

use lodestone_primitives::PeerId;
use tokio::sync::mpsc;

pub use args::ProviderArgs;
pub use config::{DEFAULT_RETENTION_SECS, DEFAULT_SWEEP_INTERVAL_SECS, ProviderConfig};
pub use error::ProviderError;
pub use handle::ProviderHandle;
pub use service::{ProviderCommand, ProviderService};
pub use table::{ProviderRecord, ProviderTable};

/// Create a provider registry actor (service and handle pair).
///
/// `local` is the identity of this node: keys announced by it are also
/// tracked in the local set returned by [`ProviderHandle::get_local`].
/// The service should be spawned as a background task.
pub fn create_provider_actor(
    local: PeerId,
    config: ProviderConfig,
) -> (ProviderService, ProviderHandle) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let table = ProviderTable::new(local, config.dedup);
    let handle = ProviderHandle::new(command_tx, config.request_timeout);
    let service = ProviderService::new(command_rx, table, config);

    (service, handle)
}

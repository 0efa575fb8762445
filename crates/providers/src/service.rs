//! Provider registry service actor (runs in its own tokio task).

use std::ops::ControlFlow;

use lodestone_primitives::{Key, Peer};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::config::{MIN_SWEEP_INTERVAL, ProviderConfig};
use crate::metrics::ProviderMetrics;
use crate::table::ProviderTable;

/// Commands from the handle to the service.
#[derive(Debug)]
pub enum ProviderCommand {
    /// Record that a peer provides a key.
    AddProvider {
        /// The key being provided.
        key: Key,
        /// The peer providing it.
        peer: Peer,
    },
    /// Ask for every peer on record for a key.
    GetProviders {
        /// The key to look up.
        key: Key,
        /// Channel to send the snapshot.
        response_tx: oneshot::Sender<Vec<Peer>>,
    },
    /// Ask for the keys provided by the local peer.
    GetLocal {
        /// Channel to send the snapshot.
        response_tx: oneshot::Sender<Vec<Key>>,
    },
    /// Stop the service.
    Halt,
}

/// Owns the provider table and applies commands and sweeps to it in order.
pub struct ProviderService {
    /// Receive commands from handles.
    command_rx: mpsc::UnboundedReceiver<ProviderCommand>,
    /// The table. Nothing outside this task can see it.
    table: ProviderTable,
    /// Sweep timing and retention.
    config: ProviderConfig,
    metrics: ProviderMetrics,
}

impl ProviderService {
    /// Create a new provider service.
    pub fn new(
        command_rx: mpsc::UnboundedReceiver<ProviderCommand>,
        table: ProviderTable,
        config: ProviderConfig,
    ) -> Self {
        Self {
            command_rx,
            table,
            config,
            metrics: ProviderMetrics::default(),
        }
    }

    /// Run the service event loop.
    ///
    /// This method runs until a `Halt` command arrives or every handle is
    /// dropped. Commands still queued at that point are discarded, which
    /// drops their response channels.
    pub async fn run(mut self) {
        let period = self.config.sweep_interval.max(MIN_SWEEP_INTERVAL);
        let mut sweep = tokio::time::interval_at(Instant::now() + period, period);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(local = %self.table.local(), ?period, "Provider service started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd).is_break() {
                            break;
                        }
                    }
                    None => {
                        debug!("All provider handles dropped, shutting down");
                        break;
                    }
                },
                _ = sweep.tick() => self.sweep(),
            }
        }
    }

    /// Convert self into a spawnable future.
    pub async fn into_task(self) {
        self.run().await;
    }

    /// Apply one command. `Break` means the loop must stop.
    fn handle_command(&mut self, cmd: ProviderCommand) -> ControlFlow<()> {
        match cmd {
            ProviderCommand::AddProvider { key, peer } => {
                trace!(%key, peer = %peer.id(), "Adding provider");
                let appended = self.table.add(key, peer, Instant::now());
                self.metrics.on_add(appended);
                self.metrics.observe(&self.table);
            }
            ProviderCommand::GetProviders { key, response_tx } => {
                let providers = self.table.providers(&key);
                trace!(%key, count = providers.len(), "Providers requested");
                // The caller may have given up; nothing to do then.
                let _ = response_tx.send(providers);
            }
            ProviderCommand::GetLocal { response_tx } => {
                let _ = response_tx.send(self.table.local_keys());
            }
            ProviderCommand::Halt => {
                debug!("Provider service halted");
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    fn sweep(&mut self) {
        let expired = self.table.sweep(Instant::now(), self.config.retention);
        self.metrics.on_sweep(expired);
        self.metrics.observe(&self.table);
        debug!(
            expired,
            remaining = self.table.record_count(),
            keys = self.table.key_count(),
            "Swept provider records"
        );
    }
}

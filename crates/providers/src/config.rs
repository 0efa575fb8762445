//! Provider registry configuration.

use std::time::Duration;

/// Default interval between eviction sweeps, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

/// Default age at which a provider record expires, in seconds.
pub const DEFAULT_RETENTION_SECS: u64 = 24 * 60 * 60;

/// Shortest sweep interval the service will run with.
pub(crate) const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Runtime configuration for the provider registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// How often the service sweeps expired records.
    pub sweep_interval: Duration,
    /// Records at least this old are removed by a sweep.
    pub retention: Duration,
    /// Deadline applied to every request/response call on a handle.
    pub request_timeout: Option<Duration>,
    /// Refresh the timestamp of an existing (key, peer) record instead of
    /// appending a duplicate.
    pub dedup: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            retention: Duration::from_secs(DEFAULT_RETENTION_SECS),
            request_timeout: None,
            dedup: false,
        }
    }
}

impl ProviderConfig {
    /// Set the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Set the retention window.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Set the default request deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enable or disable deduplication by (key, peer).
    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }
}

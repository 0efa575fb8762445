//! Provider registry metrics.

use metrics::{Counter, Gauge};

use crate::table::ProviderTable;

/// Metrics recorded by the provider service.
#[derive(Clone, Debug)]
pub(crate) struct ProviderMetrics {
    /// Records appended by AddProvider.
    added_total: Counter,
    /// Records refreshed in place (dedup mode).
    refreshed_total: Counter,
    /// Records removed by sweeps.
    expired_total: Counter,
    /// Completed sweeps.
    sweeps_total: Counter,
    /// Records currently held.
    records: Gauge,
    /// Keys currently held.
    keys: Gauge,
}

impl Default for ProviderMetrics {
    fn default() -> Self {
        Self {
            added_total: metrics::counter!("providers.added_total"),
            refreshed_total: metrics::counter!("providers.refreshed_total"),
            expired_total: metrics::counter!("providers.expired_total"),
            sweeps_total: metrics::counter!("providers.sweeps_total"),
            records: metrics::gauge!("providers.records"),
            keys: metrics::gauge!("providers.keys"),
        }
    }
}

impl ProviderMetrics {
    pub(crate) fn on_add(&self, appended: bool) {
        if appended {
            self.added_total.increment(1);
        } else {
            self.refreshed_total.increment(1);
        }
    }

    pub(crate) fn on_sweep(&self, expired: usize) {
        self.sweeps_total.increment(1);
        self.expired_total.increment(expired as u64);
    }

    /// Publish the table's current size.
    pub(crate) fn observe(&self, table: &ProviderTable) {
        self.records.set(table.record_count() as f64);
        self.keys.set(table.key_count() as f64);
    }
}

//! Block service metrics.

use metrics::Counter;

/// Metrics recorded by the block service.
#[derive(Clone, Debug)]
pub(crate) struct BlockMetrics {
    pub(crate) puts_total: Counter,
    pub(crate) local_hits_total: Counter,
    pub(crate) fetches_total: Counter,
    pub(crate) fetch_failures_total: Counter,
    pub(crate) integrity_failures_total: Counter,
}

impl Default for BlockMetrics {
    fn default() -> Self {
        Self {
            puts_total: metrics::counter!("blocks.puts_total"),
            local_hits_total: metrics::counter!("blocks.local_hits_total"),
            fetches_total: metrics::counter!("blocks.fetches_total"),
            fetch_failures_total: metrics::counter!("blocks.fetch_failures_total"),
            integrity_failures_total: metrics::counter!("blocks.integrity_failures_total"),
        }
    }
}

//! Provider registry CLI arguments.

use std::time::Duration;

use clap::{ArgAction, Args};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_RETENTION_SECS, DEFAULT_SWEEP_INTERVAL_SECS, ProviderConfig};

/// Provider registry configuration arguments.
#[derive(Debug, Args, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Provider Registry")]
#[serde(default)]
pub struct ProviderArgs {
    /// Seconds between sweeps of expired provider records
    #[arg(long = "providers.sweep-interval", default_value_t = DEFAULT_SWEEP_INTERVAL_SECS)]
    pub sweep_interval_secs: u64,

    /// Seconds after which a provider record expires
    #[arg(long = "providers.retention", default_value_t = DEFAULT_RETENTION_SECS)]
    pub retention_secs: u64,

    /// Milliseconds to wait for a registry reply before giving up
    #[arg(long = "providers.request-timeout")]
    pub request_timeout_ms: Option<u64>,

    /// Keep one record per (key, peer), refreshing it on repeat announcements
    #[arg(
        long = "providers.dedup",
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub dedup: bool,
}

impl Default for ProviderArgs {
    fn default() -> Self {
        Self {
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            retention_secs: DEFAULT_RETENTION_SECS,
            request_timeout_ms: None,
            dedup: false,
        }
    }
}

impl ProviderArgs {
    /// Validate argument values.
    pub fn validate(&self) -> Result<(), String> {
        if self.sweep_interval_secs == 0 {
            return Err("providers.sweep-interval must be at least 1 second".to_string());
        }
        if self.retention_secs == 0 {
            return Err("providers.retention must be at least 1 second".to_string());
        }
        if self.request_timeout_ms == Some(0) {
            return Err("providers.request-timeout must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Build the runtime configuration.
    pub fn config(&self) -> ProviderConfig {
        ProviderConfig {
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
            retention: Duration::from_secs(self.retention_secs),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            dedup: self.dedup,
        }
    }
}

impl From<&ProviderArgs> for ProviderConfig {
    fn from(args: &ProviderArgs) -> Self {
        args.config()
    }
}

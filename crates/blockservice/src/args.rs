//! Block service CLI arguments.

use std::time::Duration;

use clap::{ArgAction, Args};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_FETCH_TIMEOUT_SECS;

/// Block service configuration arguments.
#[derive(Debug, Args, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Blocks")]
#[serde(default)]
pub struct BlockArgs {
    /// Seconds to wait for a block from the network before giving up
    #[arg(long = "blocks.fetch-timeout", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    /// Keep blocks in memory instead of the on-disk database
    #[arg(
        long = "blocks.in-memory",
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub in_memory: bool,
}

impl Default for BlockArgs {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            in_memory: false,
        }
    }
}

impl BlockArgs {
    /// Validate argument values.
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == 0 {
            return Err("blocks.fetch-timeout must be at least 1 second".to_string());
        }
        Ok(())
    }

    /// Network fetch deadline.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        blocks: BlockArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["lodestone"]);
        assert_eq!(cli.blocks, BlockArgs::default());
        assert_eq!(cli.blocks.fetch_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "lodestone",
            "--blocks.fetch-timeout",
            "30",
            "--blocks.in-memory",
        ]);
        assert_eq!(cli.blocks.fetch_timeout(), Duration::from_secs(30));
        assert!(cli.blocks.in_memory);
        assert!(cli.blocks.validate().is_ok());

        let zero = BlockArgs {
            fetch_timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_in_memory_takes_optional_value() {
        let cli = Cli::parse_from(["lodestone", "--blocks.in-memory=false"]);
        assert!(!cli.blocks.in_memory);

        let cli = Cli::parse_from(["lodestone", "--blocks.in-memory=true"]);
        assert!(cli.blocks.in_memory);
    }
}

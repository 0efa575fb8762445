//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lodestone_blockservice::BlockArgs;
use lodestone_primitives::Key;
use lodestone_providers::ProviderArgs;

use crate::dirs::parse_path;

/// Lodestone content-addressed block store
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Logging configuration
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// Storage and registry configuration
    #[command(flatten)]
    pub(crate) node: NodeArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Logging configuration
#[derive(Debug, Args, Clone, Default)]
#[command(next_help_heading = "Logging")]
pub(crate) struct LogArgs {
    /// Only show errors
    #[arg(short, long)]
    pub(crate) quiet: bool,

    /// Verbose mode (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub(crate) verbosity: u8,

    /// Include timestamps in logs
    #[arg(long = "log.timestamps")]
    pub(crate) timestamps: bool,

    /// Extra filter directives, comma separated (e.g. `lodestone_providers=trace`)
    #[arg(long = "log.filter", value_name = "DIRECTIVE")]
    pub(crate) filter: Option<String>,
}

/// Node-wide arguments shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub(crate) struct NodeArgs {
    /// Data directory (`~` and `$VARS` are expanded)
    #[arg(long, value_name = "PATH", value_parser = parse_path)]
    pub(crate) datadir: Option<PathBuf>,

    /// Configuration file [default: <datadir>/lodestone.toml]
    #[arg(long, value_name = "FILE", value_parser = parse_path)]
    pub(crate) config: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) providers: ProviderArgs,

    #[command(flatten)]
    pub(crate) blocks: BlockArgs,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Store a block and print its key
    Put {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,
    },

    /// Write the block for KEY to stdout
    Get {
        /// Hex encoded block key
        key: Key,
    },

    /// List the peers known to provide KEY
    Providers {
        /// Hex encoded block key
        key: Key,
    },

    /// List the keys this node provides
    Local,
}

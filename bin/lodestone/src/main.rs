//! Lodestone block store binary.

mod cli;
mod commands;
mod config;
mod dirs;
mod identity;
mod logging;

use clap::{CommandFactory, FromArgMatches};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    logging::init_logging(&cli.logs)?;

    commands::run(cli, &matches, &mut tokio::io::stdout()).await
}

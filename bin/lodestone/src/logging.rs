//! Logging setup.

use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::LogArgs;

/// Build the log filter from command line arguments.
///
/// The filter is built with the following precedence:
/// 1. If `--quiet` is set, only errors are shown
/// 2. Otherwise, start with `RUST_LOG` if set, or a level picked by `-v`
/// 3. Apply any custom directives from `--log.filter`
pub(crate) fn build_filter(args: &LogArgs) -> EnvFilter {
    if args.quiet {
        return EnvFilter::new("error");
    }

    let base_level = match args.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));

    if let Some(custom_filter) = &args.filter {
        for directive in custom_filter.split(',') {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
    }

    filter
}

/// Initialize logging based on command line arguments.
///
/// Logs go to stderr so `get` can write block data to stdout.
pub(crate) fn init_logging(args: &LogArgs) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(args))
        .with_writer(std::io::stderr);

    let installed = if args.timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
    installed.map_err(|e| eyre::eyre!("failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins() {
        let args = LogArgs {
            quiet: true,
            verbosity: 3,
            ..Default::default()
        };
        assert_eq!(build_filter(&args).to_string(), "error");
    }

    #[test]
    fn test_custom_directives_are_added() {
        let args = LogArgs {
            filter: Some("lodestone_providers=trace,not a directive".to_string()),
            ..Default::default()
        };
        assert!(
            build_filter(&args)
                .to_string()
                .contains("lodestone_providers=trace")
        );
    }
}

//! Figment-based configuration loading.
//!
//! Configuration priority (highest wins):
//! 1. CLI arguments given on the command line (applied after Figment load)
//! 2. Config file (TOML)
//! 3. Environment variables (`LODESTONE_` prefix, `__` between sections)
//! 4. Defaults

use std::path::Path;

use clap::{ArgMatches, parser::ValueSource};
use eyre::{Result, WrapErr, eyre};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use lodestone_blockservice::BlockArgs;
use lodestone_providers::ProviderArgs;
use serde::{Deserialize, Serialize};

use crate::cli::NodeArgs;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct LodestoneConfig {
    /// Provider registry configuration.
    pub(crate) providers: ProviderArgs,

    /// Block service configuration.
    pub(crate) blocks: BlockArgs,
}

impl LodestoneConfig {
    /// Load configuration from defaults, environment, and config file.
    /// CLI overrides should be applied separately after loading.
    pub(crate) fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::figment(Env::prefixed("LODESTONE_").split("__"), config_path)
            .extract()
            .wrap_err("Failed to load configuration")
    }

    /// Defaults, then `env`, then the config file if it exists.
    fn figment(env: Env, config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(LodestoneConfig::default()))
            .merge(env);

        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment
    }

    /// Apply the flags that were given on the command line.
    ///
    /// `matches` must come from the same parse that produced `args`; flags left at
    /// their clap defaults do not override the loaded configuration.
    pub(crate) fn apply_args(&mut self, args: &NodeArgs, matches: &ArgMatches) {
        let given = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);

        if given("sweep_interval_secs") {
            self.providers.sweep_interval_secs = args.providers.sweep_interval_secs;
        }
        if given("retention_secs") {
            self.providers.retention_secs = args.providers.retention_secs;
        }
        if given("request_timeout_ms") {
            self.providers.request_timeout_ms = args.providers.request_timeout_ms;
        }
        if given("dedup") {
            self.providers.dedup = args.providers.dedup;
        }

        if given("fetch_timeout_secs") {
            self.blocks.fetch_timeout_secs = args.blocks.fetch_timeout_secs;
        }
        if given("in_memory") {
            self.blocks.in_memory = args.blocks.in_memory;
        }
    }

    /// Validate every section.
    pub(crate) fn validate(&self) -> Result<()> {
        self.providers.validate().map_err(|e| eyre!(e))?;
        self.blocks.validate().map_err(|e| eyre!(e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::{CommandFactory, FromArgMatches};
    use std::fs;
    use tempfile::TempDir;

    /// An env provider no test sets variables for.
    fn test_env() -> Env {
        Env::prefixed("LODESTONE_CONFIG_TEST_")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let absent = temp_dir.path().join("absent.toml");
        let config = LodestoneConfig::figment(test_env(), Some(absent.as_path()))
            .extract::<LodestoneConfig>()
            .unwrap();

        assert_eq!(config, LodestoneConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("lodestone.toml");

        fs::write(
            &config_path,
            r#"
[providers]
retention_secs = 600
dedup = true

[blocks]
fetch_timeout_secs = 9
"#,
        )
        .unwrap();

        let config = LodestoneConfig::figment(test_env(), Some(config_path.as_path()))
            .extract::<LodestoneConfig>()
            .unwrap();

        assert_eq!(config.providers.retention_secs, 600);
        assert!(config.providers.dedup);
        assert_eq!(
            config.providers.sweep_interval_secs,
            lodestone_providers::DEFAULT_SWEEP_INTERVAL_SECS
        );
        assert_eq!(config.blocks.fetch_timeout_secs, 9);
        assert!(!config.blocks.in_memory);
    }

    fn parse(argv: &[&str]) -> (NodeArgs, ArgMatches) {
        let matches = Cli::command().try_get_matches_from(argv).unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        (cli.node, matches)
    }

    fn file_config() -> LodestoneConfig {
        LodestoneConfig {
            providers: ProviderArgs {
                retention_secs: 600,
                dedup: true,
                ..Default::default()
            },
            blocks: BlockArgs {
                fetch_timeout_secs: 9,
                in_memory: true,
            },
        }
    }

    #[test]
    fn test_cli_overrides_given_flags_only() {
        let mut config = file_config();
        let (args, matches) = parse(&["lodestone", "--providers.sweep-interval", "30", "local"]);
        config.apply_args(&args, &matches);

        assert_eq!(config.providers.sweep_interval_secs, 30);
        assert_eq!(config.providers.retention_secs, 600);
        assert!(config.providers.dedup);
        assert_eq!(config.blocks.fetch_timeout_secs, 9);
        assert!(config.blocks.in_memory);
    }

    #[test]
    fn test_explicit_default_value_beats_file() {
        let mut config = file_config();
        let (args, matches) = parse(&[
            "lodestone",
            "--blocks.fetch-timeout",
            "5",
            "--providers.retention",
            "86400",
            "local",
        ]);
        config.apply_args(&args, &matches);

        assert_eq!(config.blocks.fetch_timeout_secs, 5);
        assert_eq!(config.providers.retention_secs, lodestone_providers::DEFAULT_RETENTION_SECS);
    }

    #[test]
    fn test_cli_can_switch_flags_off() {
        let mut config = file_config();
        let (args, matches) = parse(&[
            "lodestone",
            "--providers.dedup=false",
            "--blocks.in-memory=false",
            "local",
        ]);
        config.apply_args(&args, &matches);

        assert!(!config.providers.dedup);
        assert!(!config.blocks.in_memory);
        assert_eq!(config.blocks.fetch_timeout_secs, 9);
    }

    #[test]
    fn test_validate_reports_bad_values() {
        let config = LodestoneConfig {
            blocks: BlockArgs {
                fetch_timeout_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Directory management.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use eyre::{Result, eyre};

/// Returns the default project directories for Lodestone.
pub(crate) fn default_project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "lodestone", "lodestone")
}

/// Returns the default data directory path.
pub(crate) fn default_data_dir() -> Option<PathBuf> {
    default_project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Paths inside the data directory.
#[derive(Debug, Clone)]
pub(crate) struct DataDirs {
    /// Root data directory
    pub(crate) root: PathBuf,
    /// Block database file
    pub(crate) blocks_db: PathBuf,
    /// Default config file
    pub(crate) config_file: PathBuf,
    /// Persisted local peer identity
    pub(crate) peer_id: PathBuf,
}

impl DataDirs {
    /// Resolve the data directory and make sure it exists.
    pub(crate) fn new(datadir: Option<&Path>) -> Result<Self> {
        let root = datadir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_data_dir().unwrap_or_else(|| PathBuf::from(".lodestone")));

        fs::create_dir_all(&root)
            .map_err(|e| eyre!("Failed to create directory {}: {}", root.display(), e))?;

        Ok(Self {
            blocks_db: root.join("blocks.redb"),
            config_file: root.join("lodestone.toml"),
            peer_id: root.join("peer-id"),
            root,
        })
    }
}

/// Parse a path with environment variable expansion and tilde expansion.
pub(crate) fn parse_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)?;
    Ok(PathBuf::from(expanded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_expands_home() {
        let Some(base) = directories::BaseDirs::new() else {
            return;
        };
        let home = base.home_dir();
        assert_eq!(parse_path("~/blocks").unwrap(), home.join("blocks"));
        assert_eq!(parse_path("/plain/path").unwrap(), PathBuf::from("/plain/path"));
    }

    #[test]
    fn test_parse_path_unknown_variable() {
        assert!(parse_path("$LODESTONE_TEST_SURELY_UNSET_VAR/x").is_err());
    }

    #[test]
    fn test_data_dirs_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("data");
        let dirs = DataDirs::new(Some(root.as_path())).unwrap();

        assert!(root.is_dir());
        assert_eq!(dirs.root, root);
        assert_eq!(dirs.blocks_db, root.join("blocks.redb"));
        assert_eq!(dirs.config_file, root.join("lodestone.toml"));
    }
}

//! Configuration file locations

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use super::Config;

impl Config {
    /// Get the global config directory path (~/.taskxp/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".taskxp")
    }

    /// Get the global config file path (~/.taskxp/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load an explicit config file, or the global one if it exists
    ///
    /// A missing global file is not an error: defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let global_path = Self::global_config_path();
        if global_path.exists() {
            Self::from_file(&global_path)
        } else {
            debug!("No config at {}, using defaults", global_path.display());
            Ok(Self::default())
        }
    }

    /// Database file to open
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("taskxp.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config.database_path().ends_with(".taskxp/taskxp.db"));
    }

    #[test]
    fn test_database_path_override() {
        let mut config = Config::default();
        config.database.path = Some(PathBuf::from("/data/xp.db"));
        assert_eq!(config.database_path(), PathBuf::from("/data/xp.db"));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(missing.as_path())).is_err());
    }
}

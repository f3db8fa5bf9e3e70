//! Session configuration, stored as JSON

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name reported for the bundled default table
pub const DEFAULT_FILE_NAME: &str = "app_default.txt";

/// Settings shared by the generator and the file session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Length of generated keys
    pub key_length: usize,
    /// Length of generated values
    pub value_length: usize,
    /// Attempts allowed per key before generation gives up on uniqueness
    pub max_key_attempts: usize,
    /// Name the session takes after loading the default table
    pub default_file_name: String,
    /// Read the default table from this file instead of the bundled copy
    pub default_table: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_length: 3,
            value_length: 3,
            max_key_attempts: 100_000,
            default_file_name: DEFAULT_FILE_NAME.to_string(),
            default_table: None,
        }
    }
}

impl Config {
    /// Load a config file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "key_length": 4 }"#).unwrap();
        assert_eq!(config.key_length, 4);
        assert_eq!(config.value_length, 3);
        assert_eq!(config.default_file_name, DEFAULT_FILE_NAME);
        assert!(config.default_table.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kvgrid.json");

        let config = Config {
            max_key_attempts: 10,
            default_table: Some(PathBuf::from("seed.txt")),
            ..Config::default()
        };
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/kvgrid.json").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_save_to_missing_directory() {
        let err = Config::default()
            .save("/nonexistent/dir/kvgrid.json")
            .unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
    }
}

//! Application settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "rusty-sql.json";

/// Environment variable overriding [`AppConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "RUSTY_SQL_DATA_DIR";

/// User-tunable settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Repository directory of candidate files.
    pub data_dir: PathBuf,
    /// SQL the editor starts with.
    pub default_query: String,
    /// Suggested file name for exported results.
    pub export_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            default_query: "SELECT * FROM data LIMIT 5".to_string(),
            export_file_name: "query_results.csv".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read `path` if it exists, otherwise use the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Settings for the running process: [`CONFIG_FILE`] if present, then
    /// the [`DATA_DIR_ENV`] override.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(Path::new(CONFIG_FILE))?;
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = AppConfig::from_json(r#"{"data_dir": "/srv/files"}"#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/files"));
        assert_eq!(config.default_query, "SELECT * FROM data LIMIT 5");
        assert_eq!(config.export_file_name, "query_results.csv");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = AppConfig::from_json(r#"{"dataDir": "x"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn absent_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::from_file(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn malformed_file_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        match AppConfig::from_file(&path).unwrap_err() {
            Error::Config(msg) => assert!(msg.contains(CONFIG_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! Configuration file support for liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name of the JSON document inside `data_dir`
    #[serde(default = "default_store_file_name")]
    pub file_name: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_store_file_name(),
        }
    }
}

/// CSV export configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name suggested to clients downloading the export
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_export_file_name(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("data"))
        .join("liftlog")
}

fn default_store_file_name() -> String {
    "workouts.json".into()
}

fn default_export_file_name() -> String {
    "workouts.csv".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("liftlog")
            .join("config.toml")
    }

    /// Full path of the workout log
    pub fn store_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.file_name)
    }

    /// Reject settings that cannot name a file
    pub fn validate(&self) -> Result<()> {
        if self.data.file_name.trim().is_empty() {
            return Err(Error::Config("data.file_name must not be empty".into()));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(Error::Config("export.file_name must not be empty".into()));
        }
        if self.export.file_name.contains('"') {
            return Err(Error::Config(
                "export.file_name must not contain quotes".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.file_name, "workouts.json");
        assert_eq!(config.export.file_name, "workouts.csv");
        assert!(config.data.data_dir.ends_with("liftlog"));
        assert!(config.store_path().ends_with("liftlog/workouts.json"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.data.data_dir = temp_dir.path().join("data");
        config.export.file_name = "lifts.csv".into();
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
        assert_eq!(parsed.export.file_name, "lifts.csv");
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[data]
data_dir = "/srv/liftlog"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store_path(), PathBuf::from("/srv/liftlog/workouts.json"));
        assert_eq!(config.export.file_name, "workouts.csv"); // default
    }

    #[test]
    fn test_invalid_config_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[export]\nfile_name = \"\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}

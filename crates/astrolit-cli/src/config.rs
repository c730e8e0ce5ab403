//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use astrolit_classifier::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database location; defaults to `~/.astrolit/literature.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the config file and the default database.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".astrolit"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the database path, creating its directory when needed.
    pub fn database_path(&self) -> Result<PathBuf> {
        let path = match &self.database {
            Some(path) => path.clone(),
            None => Self::home()?.join("literature.db"),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrolit_classifier::ClassifierMode;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database.is_none());
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.classifier.mode, ClassifierMode::Model);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.database.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.database = Some(dir.path().join("lit.db"));
        config.settings.format = OutputFormat::Json;
        config.classifier.mode = ClassifierMode::Pattern;
        config.classifier.api_key = Some("secret".to_string());
        config.save_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("secret"));

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.database, config.database);
        assert_eq!(loaded.settings.format, OutputFormat::Json);
        assert_eq!(loaded.classifier.mode, ClassifierMode::Pattern);
        assert!(loaded.classifier.api_key.is_none());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[classifier]\nmodel = \"gpt-4o\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.classifier.model, "gpt-4o");
        assert_eq!(config.classifier.max_tokens, 500);
        assert!(config.settings.color);
    }

    #[test]
    fn test_explicit_database_path() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            database: Some(dir.path().join("sub").join("lit.db")),
            ..Config::default()
        };
        let path = config.database_path().unwrap();
        assert!(path.parent().unwrap().exists());
    }
}

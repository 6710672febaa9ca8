//! `ClientConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default preferred response language.
pub(crate) const DEFAULT_LANGUAGE: &str = "en";

/// Construction options for `TvdbClient`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct ClientConfig {
    /// Preferred response language tag (`Accept-Language`).
    #[serde(default = "default_language")]
    pub language: String,
    /// Pre-existing bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// User-Agent override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_language() -> String {
    String::from(DEFAULT_LANGUAGE)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            token: None,
            base_url: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = ClientConfig::default();

        // Assert
        assert_eq!(config.language, "en");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = ClientConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tvdb.toml");
        let config = ClientConfig {
            language: String::from("pt"),
            token: Some(String::from("abc.def.ghi")),
            ..ClientConfig::default()
        };

        // Act
        config.save(&path).unwrap();
        let loaded = ClientConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config_defaults_language() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tvdb.toml");
        std::fs::write(&path, "token = \"xyz\"\n").unwrap();

        // Act
        let config = ClientConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.language, "en");
        assert_eq!(config.token.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tvdb.toml");
        std::fs::write(&path, "language = [").unwrap();

        // Act
        let result = ClientConfig::load(&path);

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }
}

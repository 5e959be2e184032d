//! Configuration management for jikan-rs.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

/// Default Jikan API v4 base URL
pub const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Official MyAnimeList API v2 base URL
pub const DEFAULT_MAL_BASE_URL: &str = "https://api.myanimelist.net/v2";

/// Client identifier sent to the official MyAnimeList API
pub const DEFAULT_MAL_CLIENT_ID: &str = "6114d00ca681b7701d1e15fe11a4987e";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API client settings
    #[serde(default)]
    pub jikan: JikanConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JikanConfig {
    /// Jikan API base URL (may carry a version prefix)
    pub base_url: String,

    /// Official MyAnimeList API base URL, used for user list requests
    pub mal_base_url: String,

    /// Value of the X-MAL-CLIENT-ID header
    pub mal_client_id: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Overall request timeout in seconds (None = no timeout)
    pub request_timeout_secs: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log directory path
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for JikanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mal_base_url: DEFAULT_MAL_BASE_URL.to_string(),
            mal_client_id: DEFAULT_MAL_CLIENT_ID.to_string(),
            user_agent: format!("jikan-rs/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a TOML file or create default if not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the log directory path
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.logging.log_dir)
    }

    /// Parse the configured default log level, falling back to INFO
    pub fn log_level(&self) -> Level {
        Level::from_str(&self.logging.default_level).unwrap_or(Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.jikan.base_url, "https://api.jikan.moe/v4");
        assert_eq!(config.jikan.mal_base_url, "https://api.myanimelist.net/v2");
        assert_eq!(config.jikan.request_timeout_secs, None);
        assert!(config.jikan.user_agent.starts_with("jikan-rs/"));
        assert!(!config.logging.file);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("jikan.toml");

        let mut original_config = Config::default();
        original_config.jikan.base_url = "http://localhost:8080/v4".to_string();
        original_config.jikan.request_timeout_secs = Some(15);
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.jikan.base_url, "http://localhost:8080/v4");
        assert_eq!(loaded_config.jikan.request_timeout_secs, Some(15));
        assert_eq!(
            loaded_config.jikan.mal_client_id,
            original_config.jikan.mal_client_id
        );

        Ok(())
    }

    #[test]
    fn test_partial_config_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("jikan.toml");
        std::fs::write(&config_path, "[jikan]\nbase_url = \"http://127.0.0.1:9000\"\n")?;

        let config = Config::from_file(&config_path)?;
        assert_eq!(config.jikan.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.jikan.mal_base_url, DEFAULT_MAL_BASE_URL);
        assert_eq!(config.logging.default_level, "info");

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.jikan.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_or_default_on_invalid_toml() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "[jikan\nbase_url = ")?;

        assert!(Config::from_file(&config_path).is_err());
        let config = Config::load_or_default(&config_path);
        assert_eq!(config.jikan.base_url, DEFAULT_BASE_URL);

        Ok(())
    }

    #[test]
    fn test_log_level() {
        let mut config = Config::default();
        assert_eq!(config.log_level(), Level::INFO);

        config.logging.default_level = "debug".to_string();
        assert_eq!(config.log_level(), Level::DEBUG);

        config.logging.default_level = "loud".to_string();
        assert_eq!(config.log_level(), Level::INFO);
    }
}

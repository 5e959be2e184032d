//! Runtime settings read by the transport on every call.

use crate::error::{JikanError, Result};
use shared::config::{JikanConfig, DEFAULT_BASE_URL};
use std::fmt;
use std::sync::{PoisonError, RwLock};
use tracing::info;
use url::Url;

/// Source of the primary base URL.
///
/// The transport asks for the base URL at call time, so implementations may
/// change it between calls.
pub trait SettingsProvider: Send + Sync + fmt::Debug {
    fn base_url(&self) -> String;
}

/// Reconfigurable base URL holder
#[derive(Debug)]
pub struct Settings {
    base_url: RwLock<String>,
}

impl Settings {
    /// Create settings with the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;

        Ok(Self {
            base_url: RwLock::new(base_url),
        })
    }

    /// Create settings from the `[jikan]` config section
    pub fn from_config(config: &JikanConfig) -> Result<Self> {
        Self::new(config.base_url.clone())
    }

    /// Current base URL
    pub fn base_url(&self) -> String {
        self.base_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the base URL; later requests use the new value
    pub fn set_base_url(&self, base_url: impl Into<String>) -> Result<()> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;

        info!(base_url = %base_url, "Base URL updated");
        *self.base_url.write().unwrap_or_else(PoisonError::into_inner) = base_url;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: RwLock::new(DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl SettingsProvider for Settings {
    fn base_url(&self) -> String {
        Settings::base_url(self)
    }
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(JikanError::InvalidInput(format!(
            "Base URL must be hierarchical: {}",
            base_url
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.base_url(), "https://api.jikan.moe/v4");
    }

    #[test]
    fn test_set_base_url() {
        let settings = Settings::default();
        settings.set_base_url("http://localhost:9001/v4").unwrap();
        assert_eq!(settings.base_url(), "http://localhost:9001/v4");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let settings = Settings::default();
        assert!(settings.set_base_url("not a url").is_err());
        assert!(settings.set_base_url("data:text/plain,hello").is_err());
        // Failed updates leave the old value in place
        assert_eq!(settings.base_url(), DEFAULT_BASE_URL);

        assert!(Settings::new("").is_err());
    }

    #[test]
    fn test_provider_sees_updates() {
        let settings = Arc::new(Settings::default());
        let provider: Arc<dyn SettingsProvider> = settings.clone();

        settings.set_base_url("https://jikan.example.org/v4").unwrap();
        assert_eq!(provider.base_url(), "https://jikan.example.org/v4");
    }

    #[test]
    fn test_from_config() {
        let config = JikanConfig {
            base_url: "http://127.0.0.1:4000".to_string(),
            ..Default::default()
        };
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(settings.base_url(), "http://127.0.0.1:4000");
    }
}

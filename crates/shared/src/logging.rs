//! Logging infrastructure for jikan-rs.
//!
//! This module provides structured logging with optional file rotation and
//! module-specific log levels. The client library itself only emits events;
//! binaries call [`init`] to install a subscriber.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log directory path
    pub log_dir: String,
    /// Component name (used for log file naming)
    pub component: String,
    /// Default log level
    pub default_level: Level,
    /// Enable console output
    pub console: bool,
    /// Enable file output
    pub file: bool,
    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            component: "jikan".to_string(),
            default_level: Level::INFO,
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Build a logging configuration from the `[logging]` section of a config file
    pub fn from_config(config: &crate::Config, component: &str) -> Self {
        Self {
            log_dir: config.logging.log_dir.clone(),
            component: component.to_string(),
            default_level: config.log_level(),
            console: config.logging.console,
            file: config.logging.file,
            json_format: config.logging.json_format,
        }
    }

    /// Default filter directives, used when RUST_LOG is not set
    pub fn filter_directives(&self) -> String {
        format!(
            "{}={},shared={},jikan_client={},hyper=warn,reqwest=warn,h2=warn",
            self.component.replace('-', "_"),
            self.default_level,
            self.default_level,
            self.default_level
        )
    }
}

/// Initialize logging with the given configuration
///
/// Sets up tracing with:
/// - Console output (stderr, so stdout stays clean for payloads)
/// - Optional daily-rotated file output
/// - Module-specific log levels, overridable via RUST_LOG
/// - Optional JSON formatting for the file layer
pub fn init(config: LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

    let mut layers = Vec::new();

    if config.console {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr)
            .boxed();
        layers.push(console_layer);
    }

    if config.file {
        let log_dir = Path::new(&config.log_dir);
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", config.log_dir))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, &config.component);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(file_appender)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(file_appender)
                .boxed()
        };

        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        component = %config.component,
        file = config.file,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config() {
        let config = LogConfig::default();
        assert_eq!(config.component, "jikan");
        assert_eq!(config.default_level, Level::INFO);
        assert!(config.console);
        assert!(!config.file);
    }

    #[test]
    fn test_from_config() {
        let mut config = crate::Config::default();
        config.logging.default_level = "debug".to_string();
        config.logging.file = true;

        let log_config = LogConfig::from_config(&config, "jikan-cli");
        assert_eq!(log_config.component, "jikan-cli");
        assert_eq!(log_config.default_level, Level::DEBUG);
        assert!(log_config.file);
    }

    #[test]
    fn test_filter_directives() {
        let config = LogConfig {
            component: "jikan-cli".to_string(),
            default_level: Level::WARN,
            ..Default::default()
        };

        let directives = config.filter_directives();
        assert!(directives.starts_with("jikan_cli=WARN"));
        assert!(directives.contains("jikan_client=WARN"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}

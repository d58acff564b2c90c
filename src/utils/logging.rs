//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber built from [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured filter when set.

use crate::error::{Result, TokenError};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Event rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging section of [`TokenConfig`](crate::config::TokenConfig).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `keyset_token=debug,warn`
    pub filter: String,

    pub format: LogFormat,

    /// Append events to this file instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: String::from("info"),
            format: LogFormat::Text,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Returns a list of problems; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.filter.trim().is_empty() {
            errors.push("Log filter cannot be empty".to_string());
        } else if let Err(e) = EnvFilter::try_new(&self.filter) {
            errors.push(format!("Invalid log filter '{}': {e}", self.filter));
        }

        if let Some(parent) = self.file.as_deref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(format!(
                    "Log file directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        errors
    }
}

/// Initialize the global subscriber.
///
/// Fails if the configuration is invalid or a global subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(TokenError::ConfigError(errors.join("; ")));
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| TokenError::ConfigError(format!("Invalid log filter: {e}")))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let json = config.format == LogFormat::Json;

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| TokenError::ConfigError(format!("Failed to open log file: {e}")))?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        None => {
            let builder = builder.with_writer(std::io::stderr);
            if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
    };

    installed.map_err(|e| TokenError::ConfigError(format!("Failed to install subscriber: {e}")))?;

    tracing::info!(filter = %config.filter, format = ?config.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected_before_install() {
        let config = LoggingConfig {
            filter: "keyset_token=loud".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(config.validate().len(), 1);
        assert!(matches!(init_logging(&config), Err(TokenError::ConfigError(_))));
    }

    #[test]
    fn test_missing_log_directory_reported() {
        let config = LoggingConfig {
            file: Some(PathBuf::from("/nonexistent/keyset/token.log")),
            ..LoggingConfig::default()
        };
        assert!(config
            .validate()
            .iter()
            .any(|e| e.contains("does not exist")));
    }
}

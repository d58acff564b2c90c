//! # Configuration Management
//!
//! Centralized configuration for continuation token handling.
//!
//! Token options are normally fixed once at application start and shared
//! read-only by every encoder, serializer and validator built from them.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment variable overrides via `from_env()`
//!
//! ## Security Considerations
//! - Token text length is capped before any decoding work is done
//! - Decoded and decompressed payloads are capped at `MAX_PAYLOAD_SIZE`
//! - Hash protection detects corruption and casual tampering; it is not a
//!   signature and does not hide token contents

use crate::core::token::ContinuationTokenOptions;
use crate::error::{Result, TokenError};
use crate::pagination::serializer::TokenSerializer;
use crate::utils::compression::CompressionKind;
use crate::utils::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Max allowed token text length accepted for decoding (8 KiB)
pub const MAX_TOKEN_TEXT_LEN: usize = 8 * 1024;

/// Max allowed decoded payload size, compressed or not (64 KiB)
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Smallest token length limit a configuration may set
pub const MIN_TOKEN_TEXT_LEN: usize = 64;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Longest token text accepted by `deserialize`
    #[serde(default = "default_max_token_length")]
    pub max_token_length: usize,

    /// Token wire options
    #[serde(default)]
    pub options: ContinuationTokenOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_max_token_length() -> usize {
    MAX_TOKEN_TEXT_LEN
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            max_token_length: MAX_TOKEN_TEXT_LEN,
            options: ContinuationTokenOptions::DEFAULT,
            logging: LoggingConfig::default(),
        }
    }
}

impl TokenConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| TokenError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| TokenError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| TokenError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults. Set but unparsable values are
    /// reported as configuration errors rather than silently ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("KEYSET_TOKEN_INCLUDE_HASH") {
            config.options.include_hash = parse_env_bool("KEYSET_TOKEN_INCLUDE_HASH", &value)?;
        }

        if let Ok(value) = std::env::var("KEYSET_TOKEN_USE_COMPRESSION") {
            config.options.use_compression =
                parse_env_bool("KEYSET_TOKEN_USE_COMPRESSION", &value)?;
        }

        if let Ok(value) = std::env::var("KEYSET_TOKEN_COMPRESSION") {
            config.options.compression = value.parse::<CompressionKind>()?;
        }

        if let Ok(value) = std::env::var("KEYSET_TOKEN_MAX_LENGTH") {
            config.max_token_length = value.parse::<usize>().map_err(|e| {
                TokenError::ConfigError(format!("Invalid KEYSET_TOKEN_MAX_LENGTH '{value}': {e}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TokenError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| TokenError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_token_length < MIN_TOKEN_TEXT_LEN {
            errors.push(format!(
                "Max token length too small: {} (minimum: {MIN_TOKEN_TEXT_LEN})",
                self.max_token_length
            ));
        } else if self.max_token_length > MAX_PAYLOAD_SIZE {
            errors.push(format!(
                "Max token length too large: {} (maximum: {MAX_PAYLOAD_SIZE})",
                self.max_token_length
            ));
        }

        errors.extend(self.logging.validate());

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TokenError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }

    /// Build a serializer honoring the configured options and length limit
    pub fn build_serializer(&self) -> Result<TokenSerializer> {
        self.validate_strict()?;
        Ok(TokenSerializer::new(self.options).with_max_token_length(self.max_token_length))
    }
}

fn parse_env_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(TokenError::ConfigError(format!(
            "Invalid boolean for {name}: '{other}'"
        ))),
    }
}

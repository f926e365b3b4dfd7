//! # Configuration Management
//!
//! Centralized configuration for the field codec.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! ## Example
//! ```toml
//! [encoding.aliases]
//! cp1047 = "ebcdic"
//! us-ascii = "ascii"
//!
//! [logging]
//! app_name = "switch-gateway"
//! log_level = "debug"
//! json_format = false
//! ```

use crate::encoding::directive::DIRECTIVE_SEPARATOR;
use crate::encoding::EncodingRegistry;
use crate::error::{constants, CodecError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CodecConfig {
    /// Encoding registry configuration
    #[serde(default)]
    pub encoding: EncodingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| CodecError::Config(format!("{}: {e}", constants::ERR_CONFIG_OPEN)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CodecError::Config(format!("{}: {e}", constants::ERR_CONFIG_READ)))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| CodecError::Config(format!("{}: {e}", constants::ERR_CONFIG_PARSE)))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Start with defaults
        let mut config = Self::default();

        if let Ok(level) = std::env::var("ISO8583_LOG_LEVEL") {
            config.logging.log_level = level
                .parse::<Level>()
                .map_err(|_| CodecError::Config(format!("Invalid log level: {level}")))?;
        }

        if let Ok(json) = std::env::var("ISO8583_LOG_JSON") {
            config.logging.json_format = matches!(json.as_str(), "1" | "true" | "yes");
        }

        if let Ok(aliases) = std::env::var("ISO8583_ENCODING_ALIASES") {
            config.encoding.aliases.extend(parse_aliases(&aliases)?);
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
        let example = Self::default_with_overrides(|c| {
            c.encoding
                .aliases
                .insert("cp1047".to_string(), "ebcdic".to_string());
        });
        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CodecError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| CodecError::Config(format!("{}: {e}", constants::ERR_CONFIG_WRITE)))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.encoding.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CodecError::Config(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Parse `alias=target,alias=target`
fn parse_aliases(list: &str) -> Result<BTreeMap<String, String>> {
    list.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            pair.split_once('=')
                .map(|(alias, target)| (alias.trim().to_string(), target.trim().to_string()))
                .ok_or_else(|| {
                    CodecError::Config(format!(
                        "Invalid encoding alias '{pair}' (expected format: 'alias=target')"
                    ))
                })
        })
        .collect()
}

/// Encoding registry configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct EncodingConfig {
    /// Extra names resolving to already registered encodings (alias -> target)
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl EncodingConfig {
    /// Validate encoding configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (alias, target) in &self.aliases {
            if alias.is_empty() {
                errors.push("Encoding alias name cannot be empty".to_string());
            } else if alias.contains(DIRECTIVE_SEPARATOR) {
                errors.push(format!(
                    "Encoding alias '{alias}' cannot contain '{DIRECTIVE_SEPARATOR}'"
                ));
            }

            if target.is_empty() {
                errors.push(format!("Encoding alias '{alias}' has an empty target"));
            } else if self.aliases.contains_key(target) {
                errors.push(format!(
                    "Encoding alias '{alias}' points at another alias '{target}'"
                ));
            }
        }

        errors
    }

    /// Register every alias in `registry`.
    ///
    /// # Errors
    /// `UnknownEncoding` for the first alias whose target is not registered.
    pub fn apply(&self, registry: &EncodingRegistry) -> Result<()> {
        for (alias, target) in &self.aliases {
            registry.alias(alias, target)?;
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("iso8583-codec"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}

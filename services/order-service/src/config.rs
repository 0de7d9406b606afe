//! Configuration
//!
//! Sources, later overriding earlier:
//! 1. Default values
//! 2. TOML file named by `EXCHANGE_CORE_CONFIG_FILE` (default `exchange-core.toml`), if it exists
//! 3. Environment variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `EXCHANGE_CORE_MATCH_MAX_ATTEMPTS` | Searches per order before giving up on stale counter-orders | `3` |
//! | `EXCHANGE_CORE_LOG_LEVEL` | Log level | `info` |
//! | `EXCHANGE_CORE_LOG_FORMAT` | Log format (json/pretty) | `pretty` |

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_ENV: &str = "EXCHANGE_CORE_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "exchange-core.toml";

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Matching protocol settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// How many times to search again when the chosen counter-order was
    /// settled by someone else before our transfer ran
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl CoreConfig {
    /// Load from the optional config file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `EXCHANGE_CORE_*` overrides read through `lookup`.
    ///
    /// Unparsable numeric values are ignored and the previous value kept.
    /// An unknown log format is rejected.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(attempts) = lookup("EXCHANGE_CORE_MATCH_MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
            self.matching.max_attempts = attempts;
        }
        if let Some(level) = lookup("EXCHANGE_CORE_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = lookup("EXCHANGE_CORE_LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "log.format".to_string(),
                        message: format!("invalid log format '{}', must be one of: json, pretty", format),
                    })
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "matching.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if !VALID_LEVELS.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                message: format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, VALID_LEVELS
                ),
            });
        }

        Ok(())
    }
}

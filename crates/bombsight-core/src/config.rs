//! Configuration loading and typed config structures for bombsight.
//!
//! The optional configuration file is `bombsight-config.yaml`. This module
//! defines strongly-typed structs that mirror the YAML structure, and
//! provides a loader that reads and validates the file. Every field has a
//! default, so an empty document is a valid configuration.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Environment variable overriding `batch.max_concurrent_matches`.
pub const MAX_CONCURRENT_ENV: &str = "BOMBSIGHT_MAX_CONCURRENT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `bombsight-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BombsightConfig {
    /// Snapshot sampling parameters.
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Batch driver parameters.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BombsightConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `BOMBSIGHT_MAX_CONCURRENT` overrides `batch.max_concurrent_matches`
    /// when set to a valid number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply
    /// `BOMBSIGHT_MAX_CONCURRENT` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let max_concurrent = std::env::var(MAX_CONCURRENT_ENV).ok();
        Self::parse_with_override(yaml, max_concurrent.as_deref())
    }

    /// Parse configuration from a YAML string with an explicit
    /// `max_concurrent` override in place of the environment.
    ///
    /// # Errors
    ///
    /// Same as [`BombsightConfig::parse`].
    pub fn parse_with_override(
        yaml: &str,
        max_concurrent: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.batch.apply_max_concurrent_override(max_concurrent);
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = self.sampling.interval_seconds;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!("sampling.interval_seconds must be positive, got {interval}"),
            });
        }
        if self.batch.max_concurrent_matches == 0 {
            return Err(ConfigError::Invalid {
                reason: "batch.max_concurrent_matches must be at least 1".to_owned(),
            });
        }
        if self.batch.input_extension.is_empty() || self.batch.output_extension.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "batch file extensions must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

/// Snapshot sampling configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SamplingConfig {
    /// Simulated seconds that must be strictly exceeded since the last
    /// snapshot before the next one is captured.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
        }
    }
}

/// Batch driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of matches scanned at the same time.
    #[serde(default = "default_max_concurrent_matches")]
    pub max_concurrent_matches: usize,

    /// Extension (without the dot) of recorded event logs to scan.
    #[serde(default = "default_input_extension")]
    pub input_extension: String,

    /// Extension (without the dot) of the written record files.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

impl BatchConfig {
    /// Apply a raw `BOMBSIGHT_MAX_CONCURRENT` value. `None` leaves the
    /// config alone; an unparsable value is logged and ignored.
    pub fn apply_max_concurrent_override(&mut self, raw: Option<&str>) {
        let Some(raw) = raw else {
            return;
        };
        match raw.trim().parse::<usize>() {
            Ok(value) => self.max_concurrent_matches = value,
            Err(e) => warn!(
                variable = MAX_CONCURRENT_ENV,
                value = %raw,
                error = %e,
                "ignoring unparsable environment override"
            ),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_matches: default_max_concurrent_matches(),
            input_extension: default_input_extension(),
            output_extension: default_output_extension(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable log output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_interval_seconds() -> f64 {
    1.0
}

const fn default_max_concurrent_matches() -> usize {
    10
}

fn default_input_extension() -> String {
    "jsonl".to_owned()
}

fn default_output_extension() -> String {
    "csv".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

//! Parser configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound on fragment length, in bytes.
pub const DEFAULT_MAX_FRAGMENT_LEN: usize = 8192;

/// Errors that can occur when loading a [`ParseConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON deserialization failed.
    #[error("invalid config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Settings that bound fragment parsing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Fragments longer than this are not parsed past the spreadsheet name.
    pub max_fragment_len: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_fragment_len: DEFAULT_MAX_FRAGMENT_LEN,
        }
    }
}

impl ParseConfig {
    /// Replace the maximum fragment length.
    pub fn with_max_fragment_len(mut self, max_fragment_len: usize) -> Self {
        self.max_fragment_len = max_fragment_len;
        self
    }
}

/// Load and validate a [`ParseConfig`] from JSON. Missing fields take their defaults.
pub fn load_config_from_str(s: &str) -> Result<ParseConfig, ConfigError> {
    let config: ParseConfig = serde_json::from_str(s)?;
    if config.max_fragment_len == 0 {
        return Err(ConfigError::InvalidField {
            field: "max_fragment_len".into(),
            reason: "must be greater than 0".into(),
        });
    }
    Ok(config)
}

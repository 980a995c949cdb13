//! Expander configuration
//!
//! Configuration can be built in code with the `with_*` setters or loaded
//! from a TOML file:
//!
//! ```toml
//! [expander]
//! marker = "--"
//! max_depth = 64
//! missing_paste = "error"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid command marker {marker:?}: must be non-empty and contain no whitespace")]
    InvalidMarker { marker: String },
}

/// What an unmatched `Exactly1`/`OneOrMore` paste does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPastePolicy {
    /// Fail the render with `UnsatisfiedRequiredPaste`
    #[default]
    Error,
    /// Trace the miss and paste nothing
    Empty,
}

/// Configuration options for parsing and rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandConfig {
    /// Prefix that turns a line into a command line
    pub marker: String,

    /// Maximum nesting of snippet definitions, foreach re-parses and pastes
    pub max_depth: usize,

    /// Behavior of required pastes that find nothing
    pub missing_paste: MissingPastePolicy,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    expander: Option<TomlExpander>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlExpander {
    marker: Option<String>,
    max_depth: Option<usize>,
    missing_paste: Option<MissingPastePolicy>,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            marker: "--".to_string(),
            max_depth: 64,
            missing_paste: MissingPastePolicy::Error,
        }
    }
}

impl ExpandConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(expander) = parsed.expander {
            if let Some(marker) = expander.marker {
                config.marker = marker;
            }
            if let Some(max_depth) = expander.max_depth {
                config.max_depth = max_depth;
            }
            if let Some(policy) = expander.missing_paste {
                config.missing_paste = policy;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the marker can actually start a command line
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker.is_empty() || self.marker.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidMarker {
                marker: self.marker.clone(),
            });
        }
        Ok(())
    }

    /// Set the command marker
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Set the recursion ceiling
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the policy for unmatched required pastes
    pub fn with_missing_paste(mut self, policy: MissingPastePolicy) -> Self {
        self.missing_paste = policy;
        self
    }
}

//! Loader configuration with documented defaults
//!
//! All tunables of a load are collected here. A config can be built in code,
//! read from a TOML file, or left at its defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{LegendsError, Result};

/// Configuration for a legends load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    // === INPUT ===
    /// Size of the read buffer wrapped around the source file (bytes)
    ///
    /// Larger buffers mean fewer read syscalls on huge exports.
    /// Memory use of a load is this buffer plus one record subtree.
    pub read_buffer_bytes: usize,

    /// Maximum element nesting depth before the input is rejected
    ///
    /// Real exports nest at most six or seven levels. The limit turns
    /// a runaway or hostile file into a syntax error instead of
    /// unbounded stack growth while assembling a record.
    pub max_depth: usize,

    // === PROGRESS ===
    /// Minimum number of input bytes between two progress updates
    ///
    /// Records are small (a few hundred bytes), so updating after every
    /// record would contend on the progress lock for no visible benefit.
    pub progress_interval_bytes: u64,

    // === DIAGNOSTICS ===
    /// Log field names that a known record kind does not declare
    ///
    /// Each (record tag, field) pair is reported once per load at debug
    /// level. Useful when a new game version adds fields.
    pub report_unknown_fields: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            read_buffer_bytes: 64 * 1024,
            max_depth: 64,
            progress_interval_bytes: 1024 * 1024,
            report_unknown_fields: true,
        }
    }
}

impl LoaderConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LoaderConfig =
            toml::from_str(content).map_err(|e| LegendsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| LegendsError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.read_buffer_bytes < 64 {
            return Err(LegendsError::Config(format!(
                "read_buffer_bytes ({}) must be at least 64",
                self.read_buffer_bytes
            )));
        }

        // Root, section and record levels are always needed
        if self.max_depth < 3 {
            return Err(LegendsError::Config(format!(
                "max_depth ({}) must be at least 3",
                self.max_depth
            )));
        }

        if self.progress_interval_bytes == 0 {
            return Err(LegendsError::Config(
                "progress_interval_bytes must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LoaderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LoaderConfig::from_toml_str("max_depth = 12\n").unwrap();
        assert_eq!(config.max_depth, 12);
        assert_eq!(config.read_buffer_bytes, LoaderConfig::default().read_buffer_bytes);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(LoaderConfig::from_toml_str("max_depth = 1").is_err());
        assert!(LoaderConfig::from_toml_str("progress_interval_bytes = 0").is_err());
        assert!(LoaderConfig::from_toml_str("max_depth = \"deep\"").is_err());
    }
}

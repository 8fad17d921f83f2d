use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for classification and chunk packing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Maximum chunk size in UTF-8 bytes (hard limit, except for a single oversized line)
    pub max_bytes: usize,

    /// Number of leading lines inspected by content detection
    pub sample_lines: usize,

    /// Share of non-blank lines (percent) that must look like NDJSON records
    pub ndjson_ratio_percent: u8,

    /// Share of sampled lines (percent) that must start with a timestamp to count as a log
    pub log_ratio_percent: u8,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_bytes: 16 * 1024,
            sample_lines: 200,
            ndjson_ratio_percent: 60,
            log_ratio_percent: 30,
        }
    }
}

impl ChunkerConfig {
    /// Create config sized for pasting into a large model context window
    pub fn for_context_window() -> Self {
        Self {
            max_bytes: 64 * 1024,
            ..Default::default()
        }
    }

    /// Create config sized for small clipboard-friendly pieces
    pub fn for_clipboard() -> Self {
        Self {
            max_bytes: 4 * 1024,
            ..Default::default()
        }
    }

    /// Builder: set the byte budget
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(ChunkerError::InvalidMaxBytes(self.max_bytes));
        }

        if self.sample_lines == 0 {
            return Err(ChunkerError::invalid_config("sample_lines must be > 0"));
        }

        for (name, value) in [
            ("ndjson_ratio_percent", self.ndjson_ratio_percent),
            ("log_ratio_percent", self.log_ratio_percent),
        ] {
            if !(1..=100).contains(&value) {
                return Err(ChunkerError::invalid_config(format!(
                    "{name} ({value}) must be within 1..=100"
                )));
            }
        }

        Ok(())
    }
}

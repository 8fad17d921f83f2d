use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur while classifying, splitting or packing text
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// The byte budget must be a positive number of bytes
    #[error("Invalid max_bytes: {0} (must be > 0)")]
    InvalidMaxBytes(usize),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Extension is not on the allow-list
    #[error("Unsupported extension: {0}")]
    UnsupportedExtension(String),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ChunkerError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an unsupported extension error
    pub fn unsupported_extension(ext: impl Into<String>) -> Self {
        Self::UnsupportedExtension(ext.into())
    }

    /// True when the error is a caller contract violation rather than an environment failure
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidMaxBytes(_) | Self::InvalidConfig(_))
    }
}

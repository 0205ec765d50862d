//! Error types for platform table operations.

use std::path::PathBuf;

/// Errors that can occur while loading or validating a platform table.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing platform files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Platform file not found.
    #[error("platform file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No platform with the requested triplet.
    #[error("unknown triplet: '{triplet}'")]
    UnknownTriplet {
        /// The triplet that was looked up.
        triplet: String,
    },

    /// Validation error in a platform table.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for platform table operations.
pub type Result<T> = std::result::Result<T, TargetError>;

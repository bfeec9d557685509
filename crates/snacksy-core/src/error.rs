//! Error types for the Snacksy client.

use thiserror::Error;

/// Plumbing failures: files, local storage, configuration, encoding.
///
/// Failures shown next to a feature (validation, backend responses,
/// provider errors) are [`FeatureError`](crate::feature::FeatureError)
/// instead; a `SnacksyError` never reaches those slots.
#[derive(Error, Debug, Clone)]
pub enum SnacksyError {
    /// Reading or writing a file failed.
    #[error("I/O failure: {message}")]
    Io { message: String },

    /// The local key/value store could not be accessed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A JSON or TOML document could not be encoded or decoded.
    #[error("{format} encoding error: {message}")]
    Serialization { format: String, message: String },

    /// Missing or invalid settings.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SnacksyError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    fn encoding(format: &str, err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            format: format.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for SnacksyError {
    fn from(err: std::io::Error) -> Self {
        Self::io(format!("{} ({:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for SnacksyError {
    fn from(err: serde_json::Error) -> Self {
        Self::encoding("JSON", err)
    }
}

impl From<toml::de::Error> for SnacksyError {
    fn from(err: toml::de::Error) -> Self {
        Self::encoding("TOML", err)
    }
}

impl From<toml::ser::Error> for SnacksyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::encoding("TOML", err)
    }
}

pub type Result<T> = std::result::Result<T, SnacksyError>;

//! Application-wide error types.

use thiserror::Error;

/// Everything that can go wrong while building or publishing the
/// [`Configuration`](crate::config::Configuration).
///
/// Keys are reported by their environment variable name so the diagnostic
/// points at the value an operator has to fix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required value: {key}")]
    MissingValue { key: &'static str },

    #[error("invalid port for {key}: '{value}' (expected 1-65535)")]
    InvalidPort { key: &'static str, value: String },

    #[error("empty topic: {key}")]
    EmptyTopic { key: &'static str },

    #[error("{first} and {second} share the same topic '{topic}'")]
    DuplicateTopic {
        first: &'static str,
        second: &'static str,
        topic: String,
    },

    #[error("invalid topic for {key}: {reason}")]
    InvalidTopic { key: &'static str, reason: String },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("config file error: {0}")]
    File(String),

    #[error("configuration already initialized")]
    AlreadyInitialized,
}

impl ConfigError {
    /// The environment key of the offending field, if the error names one.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::MissingValue { key }
            | Self::InvalidPort { key, .. }
            | Self::EmptyTopic { key }
            | Self::InvalidTopic { key, .. }
            | Self::InvalidValue { key, .. } => Some(*key),
            Self::DuplicateTopic { second, .. } => Some(*second),
            Self::File(_) | Self::AlreadyInitialized => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

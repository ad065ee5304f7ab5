//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by exam session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while reading `EngineConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid tick interval: {raw}")]
    InvalidTickInterval { raw: String },
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

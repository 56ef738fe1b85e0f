//! CLI error types.

use thiserror::Error;

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum Error {
    /// The registry build, export or validation failed.
    #[error("{0}")]
    Core(#[from] omtypes_core::Error),

    /// Invalid command-line configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The history audit found breaking changes.
    #[error("audit failed: {0}")]
    Audit(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for warden-cli

use thiserror::Error;

/// Result type alias for warden-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in warden-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from warden-core or warden-content
    #[error(transparent)]
    Core(#[from] warden_core::Error),

    /// Writing command output failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// JSON rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

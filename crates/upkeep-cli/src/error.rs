//! Error types for upkeep-cli

use thiserror::Error;

/// Result type alias for upkeep-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in upkeep-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from upkeep-core
    #[error(transparent)]
    Core(#[from] upkeep_core::Error),

    /// Error from upkeep-store
    #[error(transparent)]
    Store(#[from] upkeep_store::Error),

    /// JSON output could not be produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

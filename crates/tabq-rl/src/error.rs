//! Error types for tabq

use thiserror::Error;

/// Errors raised while saving or loading snapshots.
///
/// Agent operations themselves never fail.
#[derive(Error, Debug)]
pub enum TabqError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for tabq operations
pub type Result<T> = std::result::Result<T, TabqError>;

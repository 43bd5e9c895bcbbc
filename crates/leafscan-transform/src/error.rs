//! Error types for leafscan-transform

use thiserror::Error;

/// Errors that can occur during geometric transformations
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] leafscan_core::Error),

    /// Invalid target size
    #[error("invalid target size: {0}")]
    InvalidSize(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;

//! Error types for leafscan-filter

use leafscan_core::PixelFormat;
use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] leafscan_core::Error),

    /// Invalid kernel
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Pixel format not accepted by this operation
    #[error("unsupported format: expected {expected}, got {actual:?}")]
    UnsupportedFormat {
        /// Expected format description
        expected: &'static str,
        /// Actual format
        actual: PixelFormat,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

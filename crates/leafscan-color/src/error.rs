//! Error types for leafscan-color

use leafscan_core::PixelFormat;
use thiserror::Error;

/// Errors that can occur during color processing operations
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] leafscan_core::Error),

    /// Pixel format not accepted by this operation
    #[error("unsupported format: expected {expected}, got {actual:?}")]
    UnsupportedFormat {
        expected: &'static str,
        actual: PixelFormat,
    },
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;

//! I/O error types
//!
//! Every format-specific module maps its underlying library errors into
//! `DecodeError` variants so that callers only handle one error type.

use thiserror::Error;

/// Error type for image loading and saving.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data is not a recognized raster format, or its format is not enabled
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The image data is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    Decode(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    Encode(String),

    /// An error from the core library
    #[error("core error: {0}")]
    Core(#[from] leafscan_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, DecodeError>;

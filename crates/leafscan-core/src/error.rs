//! Error types for leafscan-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use crate::PixelFormat;
use thiserror::Error;

/// leafscan-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Sample buffer does not match the declared geometry
    #[error("sample buffer length mismatch: expected {expected}, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    /// Index out of bounds
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} image")]
    IndexOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Pixel format not supported by this operation
    #[error("unsupported pixel format: expected {expected}, got {actual:?}")]
    UnsupportedFormat {
        expected: &'static str,
        actual: PixelFormat,
    },
}

/// Result type alias for leafscan-core operations
pub type Result<T> = std::result::Result<T, Error>;

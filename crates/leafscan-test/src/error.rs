//! Error types for the test helpers

use thiserror::Error;

/// Errors that can occur while preparing fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to build a fixture image
    #[error("failed to build fixture: {0}")]
    Fixture(#[from] leafscan_core::Error),

    /// Failed to write an image
    #[error("failed to write image '{path}': {message}")]
    ImageWrite { path: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;

//! Error types for leafscan-features

use thiserror::Error;

/// Feature extraction failed
///
/// Raised instead of ever returning a vector with NaN or infinite entries.
#[derive(Debug, Error)]
pub enum FeatureExtractionError {
    /// Resizing onto the analysis canvas failed
    #[error("resize failed: {0}")]
    Transform(#[from] leafscan_transform::TransformError),

    /// Color conversion failed
    #[error("color conversion failed: {0}")]
    Color(#[from] leafscan_color::ColorError),

    /// Smoothing or edge detection failed
    #[error("filtering failed: {0}")]
    Filter(#[from] leafscan_filter::FilterError),

    /// The edge detector produced something other than a one-channel map
    #[error("edge map has format {0:?}, expected Gray8")]
    EdgeMapFormat(leafscan_core::PixelFormat),

    /// The co-occurrence accumulator received no pixel pairs
    #[error("co-occurrence matrix is empty")]
    EmptyCooccurrence,

    /// A statistic came out NaN or infinite
    #[error("feature {feature} is not finite: {value}")]
    NonFinite { feature: &'static str, value: f64 },

    /// Extraction options are unusable
    #[error("invalid extraction options: {0}")]
    InvalidOptions(String),
}

/// Result type for feature extraction
pub type FeatureResult<T> = Result<T, FeatureExtractionError>;

//! leafscan-color - Color space conversion
//!
//! 8-bit conversions used by the feature extractor:
//!
//! - RGB -> HSV with hue in half-degrees ([0, 180))
//! - RGB -> luminance
//! - Per-channel HSV means
//!
//! All conversions are integer fixed-point, so results are identical on
//! every platform.

pub mod colorspace;
mod error;

pub use colorspace::{
    ColorChannel, Hsv8, HsvMeans, convert_rgb_to_hsv, convert_to_gray, extract_channel,
    hsv_means, rgb_to_gray, rgb_to_hsv,
};
pub use error::{ColorError, ColorResult};

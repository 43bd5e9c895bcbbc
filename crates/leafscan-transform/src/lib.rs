//! leafscan-transform - Geometric resampling
//!
//! Resizes images to the fixed analysis canvas:
//!
//! - Bilinear interpolation in fixed point
//! - Nearest-neighbor sampling
//! - Exact 2x reduction by box averaging

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{ScaleMethod, scale_to_size, scale_to_size_with_method};

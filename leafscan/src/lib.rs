//! leafscan - Leaf health classification from photographs
//!
//! # Overview
//!
//! - Image I/O (PNG, JPEG) in [`io`]
//! - Resampling, color conversion and filtering in [`transform`],
//!   [`color`] and [`filter`]
//! - Five-number leaf descriptors in [`features`]
//! - Dataset building, SVM training, prediction and model management in
//!   [`classify`]
//!
//! # Example
//!
//! ```
//! use leafscan::{Image, PixelFormat};
//!
//! let image = Image::new(64, 48, PixelFormat::Rgb8).unwrap();
//! let features = leafscan::features::extract(&image).unwrap();
//! assert_eq!(features.as_slice().len(), leafscan::features::FEATURE_DIM);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use leafscan_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use leafscan_classify as classify;
pub use leafscan_color as color;
pub use leafscan_features as features;
pub use leafscan_filter as filter;
pub use leafscan_io as io;
pub use leafscan_transform as transform;

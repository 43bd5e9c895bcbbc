//! leafscan-features - Leaf image feature extraction
//!
//! Reduces an image of any size to a [`FeatureVector`] of five numbers:
//! mean hue, mean saturation, mean value, edge density and GLCM texture
//! contrast. Extraction is a pure function of the pixel grid and the
//! [`ExtractOptions`]; the same input always yields bit-identical output.
//!
//! ```no_run
//! use leafscan_features::extract;
//! # fn run(image: &leafscan_core::Image) -> Result<(), leafscan_features::FeatureExtractionError> {
//! let features = extract(image)?;
//! println!("{}", features);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod extract;
pub mod glcm;
pub mod vector;

pub use error::{FeatureExtractionError, FeatureResult};
pub use extract::{ExtractOptions, extract, extract_with_options};
pub use glcm::Glcm;
pub use vector::{FEATURE_DIM, FEATURE_NAMES, FeatureVector};

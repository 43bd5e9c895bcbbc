//! leafscan-test - Regression test helpers for leafscan
//!
//! Provides [`RegParams`], which collects check results instead of
//! panicking on the first mismatch, and synthetic fixture builders that
//! produce leaf-like images in memory or on disk.
//!
//! # Usage
//!
//! ```ignore
//! use leafscan_test::RegParams;
//!
//! let mut rp = RegParams::new("features");
//! rp.compare_values(0.0, features.edge_density(), 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use fixtures::{
    HEALTHY_GREEN, NECROTIC_BROWN, gray_ramp, noisy_leaf, solid_rgb, write_corrupt_file,
    write_leaf_collection, write_png_fixture,
};
pub use params::RegParams;

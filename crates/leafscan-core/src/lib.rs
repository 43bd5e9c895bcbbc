//! leafscan-core - Basic data structures for leaf image analysis
//!
//! This crate provides the pixel grid shared by every stage of the
//! leafscan pipeline:
//!
//! - [`Image`] / [`ImageMut`] - The image container (immutable / mutable)
//! - [`PixelFormat`] - Sample layout of an image (gray, RGB, HSV)
//!
//! Every image is 8 bits per sample, stored row-major with interleaved
//! channels and no row padding.

pub mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::{Image, ImageMut, PixelFormat};

//! leafscan-filter - Image filtering
//!
//! Neighborhood operations on 8-bit gray images:
//!
//! - Separable Gaussian smoothing in fixed point
//! - Sobel gradients
//! - Two-threshold (Canny) edge detection

pub mod convolve;
pub mod edge;
mod error;
pub mod kernel;

pub use convolve::{convolve_sep, gaussian_blur};
pub use edge::{Gradients, canny, sobel_gradients};
pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

//! Convolution kernels
//!
//! One-dimensional kernels for separable filtering. Weights are kept as
//! `f32` and converted to 8-bit fixed point before they touch pixels.

use crate::{FilterError, FilterResult};

/// Fractional bits of fixed-point kernel weights
pub const KERNEL_BITS: u32 = 8;
const KERNEL_ONE: u32 = 1 << KERNEL_BITS;

/// Binomial kernels used when no sigma is given
const SMALL_GAUSSIAN: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// A 1D convolution kernel with its origin at the center tap
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f32>,
}

impl Kernel {
    /// Create a kernel from a slice of weights.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] for an empty or even-length slice.
    pub fn from_slice(data: &[f32]) -> FilterResult<Self> {
        if data.is_empty() || data.len() % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel length must be odd, got {}",
                data.len()
            )));
        }
        Ok(Kernel {
            data: data.to_vec(),
        })
    }

    /// Create a normalized Gaussian kernel.
    ///
    /// With `sigma <= 0` the width is derived from the size as
    /// `0.3 * ((size - 1) / 2 - 1) + 0.8`; sizes up to 7 then use the
    /// exact binomial weights.
    pub fn gaussian(size: u32, sigma: f64) -> FilterResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian size must be odd and positive, got {}",
                size
            )));
        }
        if sigma <= 0.0 && size <= 7 {
            return Self::from_slice(SMALL_GAUSSIAN[(size / 2) as usize]);
        }
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8
        };
        let center = f64::from(size / 2);
        let scale = -0.5 / (sigma * sigma);
        let raw: Vec<f64> = (0..size)
            .map(|i| {
                let x = f64::from(i) - center;
                (scale * x * x).exp()
            })
            .collect();
        let total: f64 = raw.iter().sum();
        Self::from_slice(&raw.iter().map(|v| (v / total) as f32).collect::<Vec<_>>())
    }

    /// Number of taps.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; kernels have at least one tap.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Half-width of the kernel (taps on each side of the center).
    pub fn radius(&self) -> usize {
        self.data.len() / 2
    }

    /// Kernel weights.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Weights in fixed point with [`KERNEL_BITS`] fractional bits.
    ///
    /// Each weight is rounded and the center tap absorbs the rounding
    /// residue, so the taps of a normalized kernel sum to exactly 1.0.
    pub fn to_fixed(&self) -> Vec<u32> {
        let mut fixed: Vec<i64> = self
            .data
            .iter()
            .map(|&w| (f64::from(w) * f64::from(KERNEL_ONE)).round() as i64)
            .collect();
        let target = (f64::from(self.sum()) * f64::from(KERNEL_ONE)).round() as i64;
        let residue = target - fixed.iter().sum::<i64>();
        let c = self.radius();
        fixed[c] += residue;
        fixed.into_iter().map(|w| w.max(0) as u32).collect()
    }
}

//! Gray-level co-occurrence matrix
//!
//! Counts horizontally adjacent intensity pairs `(I(y, x), I(y, x + 1))`
//! for every row except the last and every column except the last. The
//! last column only appears as a right-hand neighbor.

use crate::{FeatureExtractionError, FeatureResult};
use leafscan_core::{Image, PixelFormat};

/// Number of gray levels
pub const LEVELS: usize = 256;

/// Co-occurrence counts for one gray image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glcm {
    counts: Vec<u32>,
    total: u64,
}

impl Glcm {
    /// Accumulate the horizontal co-occurrences of a gray image.
    ///
    /// Non-gray images produce an empty matrix.
    pub fn horizontal(image: &Image) -> Self {
        let mut counts = vec![0u32; LEVELS * LEVELS];
        let mut total = 0u64;
        if image.format() == PixelFormat::Gray8 {
            for y in 0..image.height().saturating_sub(1) {
                let row = image.row(y);
                // windows(2) excludes the last column as a left-hand pixel
                for pair in row.windows(2) {
                    counts[usize::from(pair[0]) * LEVELS + usize::from(pair[1])] += 1;
                    total += 1;
                }
            }
        }
        Glcm { counts, total }
    }

    /// Number of pairs accumulated.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count of pairs `(a, b)`.
    pub fn count(&self, a: u8, b: u8) -> u32 {
        self.counts[usize::from(a) * LEVELS + usize::from(b)]
    }

    /// Joint probability matrix, row-major `LEVELS x LEVELS`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureExtractionError::EmptyCooccurrence`] if no pairs
    /// were accumulated.
    pub fn normalized(&self) -> FeatureResult<Vec<f64>> {
        if self.total == 0 {
            return Err(FeatureExtractionError::EmptyCooccurrence);
        }
        let total = self.total as f64;
        Ok(self.counts.iter().map(|&c| f64::from(c) / total).collect())
    }

    /// `sum_{a,b} (a - b)^2 * P(a, b)`
    pub fn contrast(&self) -> FeatureResult<f64> {
        let p = self.normalized()?;
        let contrast = p
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, &v)| {
                let d = (i / LEVELS) as f64 - (i % LEVELS) as f64;
                d * d * v
            })
            .sum();
        Ok(contrast)
    }
}

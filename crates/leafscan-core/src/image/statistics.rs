//! Image statistics
//!
//! Whole-image reductions over the samples of each channel.

use super::Image;

impl Image {
    /// Arithmetic mean of each channel over every pixel.
    ///
    /// The returned vector has one entry per sample in storage order.
    /// Sums are accumulated in `u64`, so the result does not depend on
    /// the order pixels are visited.
    pub fn mean_per_channel(&self) -> Vec<f64> {
        let spp = self.spp() as usize;
        let mut sums = vec![0u64; spp];
        for px in self.data().chunks_exact(spp) {
            for (sum, &v) in sums.iter_mut().zip(px) {
                *sum += u64::from(v);
            }
        }
        let n = self.pixel_count() as f64;
        sums.into_iter().map(|s| s as f64 / n).collect()
    }

    /// Sum of all samples of a single-channel image.
    ///
    /// Returns `None` for multi-channel images.
    pub fn sum_gray(&self) -> Option<u64> {
        if self.spp() != 1 {
            return None;
        }
        Some(self.data().iter().map(|&v| u64::from(v)).sum())
    }
}

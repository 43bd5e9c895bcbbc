//! The fixed-length feature vector

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features per image
pub const FEATURE_DIM: usize = 5;

/// Feature names, in vector order
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "mean_hue",
    "mean_saturation",
    "mean_value",
    "edge_density",
    "texture_contrast",
];

/// `[meanH, meanS, meanV, edgeDensity, textureContrast]`
///
/// Hue is in half-degrees ([0, 180)), saturation and value in [0, 255].
/// Edge density is the mean of a 0/255 edge map, so it lies in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_DIM]);

impl FeatureVector {
    pub fn new(
        mean_hue: f64,
        mean_saturation: f64,
        mean_value: f64,
        edge_density: f64,
        texture_contrast: f64,
    ) -> Self {
        FeatureVector([
            mean_hue,
            mean_saturation,
            mean_value,
            edge_density,
            texture_contrast,
        ])
    }

    /// Build a vector from exactly [`FEATURE_DIM`] values.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        <[f64; FEATURE_DIM]>::try_from(values).ok().map(FeatureVector)
    }

    pub fn mean_hue(&self) -> f64 {
        self.0[0]
    }

    pub fn mean_saturation(&self) -> f64 {
        self.0[1]
    }

    pub fn mean_value(&self) -> f64 {
        self.0[2]
    }

    pub fn edge_density(&self) -> f64 {
        self.0[3]
    }

    pub fn texture_contrast(&self) -> f64 {
        self.0[4]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_array(self) -> [f64; FEATURE_DIM] {
        self.0
    }

    /// Pairs of feature name and value, in vector order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<[f64; FEATURE_DIM]> for FeatureVector {
    fn from(values: [f64; FEATURE_DIM]) -> Self {
        FeatureVector(values)
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "H={:.2} S={:.2} V={:.2} edge={:.4} contrast={:.4}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        let v = FeatureVector::new(1.0, 2.0, 3.0, 4.0, 5.0);
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(v.edge_density(), 4.0);
        let names: Vec<_> = v.named().map(|(n, _)| n).collect();
        assert_eq!(names, FEATURE_NAMES);
    }

    #[test]
    fn test_from_slice_length() {
        assert!(FeatureVector::from_slice(&[0.0; 4]).is_none());
        assert!(FeatureVector::from_slice(&[0.0; 6]).is_none());
        assert_eq!(
            FeatureVector::from_slice(&[1.0; 5]),
            Some(FeatureVector::from([1.0; 5]))
        );
    }
}

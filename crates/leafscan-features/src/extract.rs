//! Image to feature vector
//!
//! The pipeline, for an input of any size:
//!
//! 1. Bilinear resize onto a square canvas (200x200 by default)
//! 2. HSV conversion and per-channel means
//! 3. Luminance, Canny edges, edge density = sum(edge map) / canvas area
//! 4. Gaussian blur of the luminance
//! 5. Horizontal co-occurrence matrix of the blurred luminance and its contrast

use crate::glcm::Glcm;
use crate::vector::{FEATURE_NAMES, FeatureVector};
use crate::{FeatureExtractionError, FeatureResult};
use leafscan_color::{convert_rgb_to_hsv, convert_to_gray, hsv_means};
use leafscan_core::{Image, PixelFormat};
use leafscan_filter::{canny, gaussian_blur};
use leafscan_transform::scale_to_size;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Feature extraction parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Side of the square analysis canvas
    pub canvas_size: u32,
    /// Lower hysteresis threshold of the edge detector
    pub canny_low: f64,
    /// Upper hysteresis threshold of the edge detector
    pub canny_high: f64,
    /// Gaussian window applied before texture analysis (odd)
    pub blur_size: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            canvas_size: 200,
            canny_low: 100.0,
            canny_high: 200.0,
            blur_size: 7,
        }
    }
}

impl ExtractOptions {
    /// Check the options before running the pipeline.
    pub fn validate(&self) -> FeatureResult<()> {
        if self.canvas_size == 0 {
            return Err(FeatureExtractionError::InvalidOptions(
                "canvas_size must be positive".to_string(),
            ));
        }
        if self.blur_size == 0 || self.blur_size % 2 == 0 {
            return Err(FeatureExtractionError::InvalidOptions(format!(
                "blur_size must be odd, got {}",
                self.blur_size
            )));
        }
        Ok(())
    }

    fn canvas_area(&self) -> f64 {
        f64::from(self.canvas_size) * f64::from(self.canvas_size)
    }
}

/// Extract the feature vector of an image with the default options.
pub fn extract(image: &Image) -> FeatureResult<FeatureVector> {
    extract_with_options(image, &ExtractOptions::default())
}

/// Extract the feature vector of an image.
///
/// Gray input is treated as an RGB image with three equal channels.
///
/// # Errors
///
/// Any failing stage is reported as a [`FeatureExtractionError`]; a
/// vector is only returned when all five entries are finite.
pub fn extract_with_options(
    image: &Image,
    options: &ExtractOptions,
) -> FeatureResult<FeatureVector> {
    options.validate()?;
    let rgb = to_rgb(image)?;
    let canvas = scale_to_size(&rgb, options.canvas_size, options.canvas_size)?;

    let hsv = convert_rgb_to_hsv(&canvas)?;
    let means = hsv_means(&hsv)?;

    let gray = convert_to_gray(&canvas)?;
    let edges = canny(&gray, options.canny_low, options.canny_high)?;
    let (edge_sum, edge_density) = edge_density(&edges, options.canvas_area())?;

    let blurred = gaussian_blur(&gray, options.blur_size, 0.0)?;
    let glcm = Glcm::horizontal(&blurred);
    let contrast = glcm.contrast()?;

    let features = FeatureVector::new(means.h, means.s, means.v, edge_density, contrast);
    for (&name, &value) in FEATURE_NAMES.iter().zip(features.as_slice()) {
        if !value.is_finite() {
            return Err(FeatureExtractionError::NonFinite {
                feature: name,
                value,
            });
        }
    }

    debug!(
        source_width = image.width(),
        source_height = image.height(),
        edge_pixels = edge_sum / 255,
        glcm_pairs = glcm.total(),
        %features,
        "extracted features"
    );
    Ok(features)
}

/// Sum of a 0/255 edge map and that sum over the canvas area.
fn edge_density(edges: &Image, area: f64) -> FeatureResult<(u64, f64)> {
    let sum = edges
        .sum_gray()
        .ok_or(FeatureExtractionError::EdgeMapFormat(edges.format()))?;
    Ok((sum, sum as f64 / area))
}

fn to_rgb(image: &Image) -> FeatureResult<Image> {
    match image.format() {
        PixelFormat::Rgb8 => Ok(image.clone()),
        PixelFormat::Gray8 => {
            let data = image.data().iter().flat_map(|&g| [g, g, g]).collect();
            Ok(
                Image::from_raw(image.width(), image.height(), PixelFormat::Rgb8, data)
                    .map_err(leafscan_color::ColorError::from)?,
            )
        }
        other => Err(leafscan_color::ColorError::UnsupportedFormat {
            expected: "Gray8 or Rgb8",
            actual: other,
        }
        .into()),
    }
}

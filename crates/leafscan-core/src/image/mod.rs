//! Image - The pixel grid container
//!
//! The `Image` structure is the image type passed between every stage of
//! the pipeline: the loader produces it, the transforms and color
//! conversions consume and produce it, and the feature extractor reduces
//! it to numbers.
//!
//! # Sample layout
//!
//! - One byte per sample, rows stored top to bottom without padding
//! - Color samples are interleaved (`R G B R G B ...` or `H S V ...`)
//! - The [`PixelFormat`] tag records how the samples are to be read
//!
//! # Ownership model
//!
//! `Image` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `ImageMut` via [`Image::try_into_mut`]
//! or [`Image::to_mut`], then convert back with `Into<Image>`.

mod access;
pub mod statistics;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Sample layout of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit single-channel luminance
    Gray8,
    /// 8-bit red, green, blue
    Rgb8,
    /// 8-bit hue, saturation, value
    ///
    /// Hue is stored in half-degrees ([0, 180)), saturation and value
    /// in [0, 255].
    Hsv8,
}

impl PixelFormat {
    /// Number of samples stored for each pixel.
    pub fn samples_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 | PixelFormat::Hsv8 => 3,
        }
    }
}

/// Internal image data
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Sample layout
    format: PixelFormat,
    /// The samples, row-major, interleaved
    data: Vec<u8>,
}

impl ImageData {
    fn stride(&self) -> usize {
        self.width as usize * self.format.samples_per_pixel() as usize
    }
}

/// Image - Immutable pixel grid
///
/// `Image` uses reference counting via `Arc`, so clones share the
/// underlying samples.
///
/// # Examples
///
/// ```
/// use leafscan_core::{Image, PixelFormat};
///
/// let image = Image::new(200, 200, PixelFormat::Rgb8).unwrap();
/// assert_eq!(image.width(), 200);
/// assert_eq!(image.data().len(), 200 * 200 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    inner: Arc<ImageData>,
}

impl Image {
    /// Create a new zero-filled image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let len = Self::buffer_len(width, height, format)?;
        Ok(Image {
            inner: Arc::new(ImageData {
                width,
                height,
                format,
                data: vec![0u8; len],
            }),
        })
    }

    /// Wrap an existing sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for an empty grid and
    /// [`Error::DataLengthMismatch`] when `data` does not hold exactly
    /// `width * height * samples_per_pixel` bytes.
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = Self::buffer_len(width, height, format)?;
        if data.len() != expected {
            return Err(Error::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Image {
            inner: Arc::new(ImageData {
                width,
                height,
                format,
                data,
            }),
        })
    }

    fn buffer_len(width: u32, height: u32, format: PixelFormat) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(format.samples_per_pixel() as usize))
            .ok_or(Error::InvalidDimension { width, height })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the sample layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.format
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.format.samples_per_pixel()
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.width as usize * self.inner.height as usize
    }

    /// Get raw access to the samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the samples of one row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.inner.stride();
        let start = y as usize * stride;
        &self.inner.data[start..start + stride]
    }

    /// Get the number of strong references to the shared samples.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check if two images have the same width, height, and format.
    pub fn sizes_equal(&self, other: &Image) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.format == other.inner.format
    }

    /// Create a deep copy of this image.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Image {
            inner: Arc::new(ImageData::clone(&self.inner)),
        }
    }

    /// Try to get mutable access to the samples.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<ImageMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(ImageMut { inner: data }),
            Err(arc) => Err(Image { inner: arc }),
        }
    }

    /// Create a mutable copy of this image.
    pub fn to_mut(&self) -> ImageMut {
        ImageMut {
            inner: ImageData::clone(&self.inner),
        }
    }
}

/// Mutable image
///
/// Allows modification of the samples. Convert back to an immutable
/// [`Image`] using `Into<Image>`.
#[derive(Debug)]
pub struct ImageMut {
    inner: ImageData,
}

impl ImageMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the sample layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.format
    }

    /// Get samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.format.samples_per_pixel()
    }

    /// Get raw access to the samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Set every sample to `val`.
    pub fn fill(&mut self, val: u8) {
        self.inner.data.fill(val);
    }

    /// Set every pixel of a color image to the given triple.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for single-channel images.
    pub fn fill_triple(&mut self, a: u8, b: u8, c: u8) -> Result<()> {
        if self.spp() != 3 {
            return Err(Error::UnsupportedFormat {
                expected: "3-channel image",
                actual: self.inner.format,
            });
        }
        for px in self.inner.data.chunks_exact_mut(3) {
            px[0] = a;
            px[1] = b;
            px[2] = c;
        }
        Ok(())
    }
}

impl From<ImageMut> for Image {
    fn from(image: ImageMut) -> Self {
        Image {
            inner: Arc::new(image.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_per_pixel() {
        assert_eq!(PixelFormat::Gray8.samples_per_pixel(), 1);
        assert_eq!(PixelFormat::Rgb8.samples_per_pixel(), 3);
        assert_eq!(PixelFormat::Hsv8.samples_per_pixel(), 3);
    }

    #[test]
    fn test_image_creation() {
        let image = Image::new(100, 50, PixelFormat::Gray8).unwrap();
        assert_eq!(image.width(), 100);
        assert_eq!(image.height(), 50);
        assert_eq!(image.pixel_count(), 5000);
        assert_eq!(image.data().len(), 5000);
        assert!(image.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_image_creation_invalid() {
        assert!(Image::new(0, 100, PixelFormat::Rgb8).is_err());
        assert!(Image::new(100, 0, PixelFormat::Rgb8).is_err());
    }

    #[test]
    fn test_from_raw_length_checked() {
        let err = Image::from_raw(2, 2, PixelFormat::Rgb8, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            Error::DataLengthMismatch {
                expected: 12,
                actual: 11
            }
        ));
        let exact = Image::from_raw(2, 2, PixelFormat::Rgb8, vec![0; 12]);
        assert!(exact.is_ok());
    }

    #[test]
    fn test_clone_shares_data() {
        let image = Image::new(10, 10, PixelFormat::Gray8).unwrap();
        let other = image.clone();
        assert_eq!(image.ref_count(), 2);
        assert!(other.try_into_mut().is_err());
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let image = Image::new(10, 10, PixelFormat::Gray8).unwrap();
        let copy = image.deep_clone();
        assert_eq!(image.ref_count(), 1);
        assert_eq!(copy.ref_count(), 1);
        assert_eq!(image, copy);
    }

    #[test]
    fn test_image_mut_roundtrip() {
        let image = Image::new(4, 3, PixelFormat::Gray8).unwrap();
        let mut image_mut = image.try_into_mut().unwrap();
        image_mut.set_gray(2, 1, 77).unwrap();
        let image: Image = image_mut.into();
        assert_eq!(image.row(1)[2], 77);
        assert_eq!(image.data()[4 + 2], 77);
    }

    #[test]
    fn test_fill_triple() {
        let mut image_mut = Image::new(3, 2, PixelFormat::Rgb8).unwrap().to_mut();
        image_mut.fill_triple(1, 2, 3).unwrap();
        let image: Image = image_mut.into();
        assert_eq!(&image.row(1)[3..6], &[1, 2, 3]);

        let mut gray = Image::new(3, 2, PixelFormat::Gray8).unwrap().to_mut();
        assert!(gray.fill_triple(1, 2, 3).is_err());
    }
}

//! Pixel access functions
//!
//! Getters and setters for individual pixels. Checked variants return
//! `Option`/`Result`; the `_unchecked` setters index directly and panic
//! on out-of-range coordinates.

use super::{Image, ImageData, ImageMut};
use crate::error::{Error, Result};

impl ImageData {
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.format.samples_per_pixel() as usize
    }

    #[inline]
    fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn get_gray(&self, x: u32, y: u32) -> Option<u8> {
        if self.format.samples_per_pixel() != 1 || !self.contains(x, y) {
            return None;
        }
        Some(self.data[self.offset(x, y)])
    }

    fn get_triple(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if self.format.samples_per_pixel() != 3 || !self.contains(x, y) {
            return None;
        }
        let i = self.offset(x, y);
        Some((self.data[i], self.data[i + 1], self.data[i + 2]))
    }
}

impl Image {
    /// Get a gray value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds or the image is
    /// not single-channel.
    pub fn get_gray(&self, x: u32, y: u32) -> Option<u8> {
        self.inner.get_gray(x, y)
    }

    /// Get the three samples at (x, y) of an RGB or HSV image.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.inner.get_triple(x, y)
    }
}

impl ImageMut {
    /// Get a gray value at (x, y).
    pub fn get_gray(&self, x: u32, y: u32) -> Option<u8> {
        self.inner.get_gray(x, y)
    }

    /// Get the three samples at (x, y).
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.inner.get_triple(x, y)
    }

    /// Set a gray value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds
    /// and [`Error::UnsupportedFormat`] for multi-channel images.
    pub fn set_gray(&mut self, x: u32, y: u32, val: u8) -> Result<()> {
        if self.inner.format.samples_per_pixel() != 1 {
            return Err(Error::UnsupportedFormat {
                expected: "single-channel image",
                actual: self.inner.format,
            });
        }
        self.inner.check_bounds(x, y)?;
        self.set_gray_unchecked(x, y, val);
        Ok(())
    }

    /// Set a gray value without bounds checking.
    #[inline]
    pub fn set_gray_unchecked(&mut self, x: u32, y: u32, val: u8) {
        let i = self.inner.offset(x, y);
        self.inner.data[i] = val;
    }

    /// Set the three samples at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds
    /// and [`Error::UnsupportedFormat`] for single-channel images.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.inner.format.samples_per_pixel() != 3 {
            return Err(Error::UnsupportedFormat {
                expected: "3-channel image",
                actual: self.inner.format,
            });
        }
        self.inner.check_bounds(x, y)?;
        self.set_rgb_unchecked(x, y, r, g, b);
        Ok(())
    }

    /// Set the three samples at (x, y) without bounds checking.
    #[inline]
    pub fn set_rgb_unchecked(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        let i = self.inner.offset(x, y);
        let d = &mut self.inner.data;
        d[i] = r;
        d[i + 1] = g;
        d[i + 2] = b;
    }
}

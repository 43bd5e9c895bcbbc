//! Synthetic leaf fixtures
//!
//! Builders for the images the regression tests feed through the
//! pipeline: flat color fields, noisy "leaf" textures around a base
//! color, and on-disk collections of them.

use crate::error::{TestError, TestResult};
use leafscan_core::{Image, PixelFormat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};

/// Saturated leaf green
pub const HEALTHY_GREEN: (u8, u8, u8) = (40, 170, 50);

/// Brown, necrotic tissue
pub const NECROTIC_BROWN: (u8, u8, u8) = (120, 75, 30);

/// A single-color RGB image.
pub fn solid_rgb(width: u32, height: u32, r: u8, g: u8, b: u8) -> TestResult<Image> {
    let mut image = Image::new(width, height, PixelFormat::Rgb8)?.to_mut();
    image.fill_triple(r, g, b)?;
    Ok(image.into())
}

/// A gray image with a horizontal ramp from 0 to 255.
pub fn gray_ramp(width: u32, height: u32) -> TestResult<Image> {
    let mut image = Image::new(width, height, PixelFormat::Gray8)?.to_mut();
    let denom = width.saturating_sub(1).max(1);
    for y in 0..height {
        for x in 0..width {
            image.set_gray_unchecked(x, y, (x * 255 / denom) as u8);
        }
    }
    Ok(image.into())
}

/// An RGB image whose pixels scatter uniformly around `base`.
///
/// Each channel is offset by a value drawn from `-amplitude..=amplitude`
/// and clamped to [0, 255]. The same seed always produces the same image.
pub fn noisy_leaf(
    width: u32,
    height: u32,
    base: (u8, u8, u8),
    amplitude: u8,
    seed: u64,
) -> TestResult<Image> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut image = Image::new(width, height, PixelFormat::Rgb8)?.to_mut();
    let amp = i32::from(amplitude);
    let mut jitter = |c: u8| -> u8 {
        let d = if amp == 0 {
            0
        } else {
            rng.random_range(-amp..=amp)
        };
        (i32::from(c) + d).clamp(0, 255) as u8
    };
    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = (jitter(base.0), jitter(base.1), jitter(base.2));
            image.set_rgb_unchecked(x, y, r, g, b);
        }
    }
    Ok(image.into())
}

/// Write `image` as a PNG named `name` inside `dir`.
pub fn write_png_fixture(dir: &Path, name: &str, image: &Image) -> TestResult<PathBuf> {
    let path = dir.join(name);
    leafscan_io::write_image(image, &path).map_err(|e| TestError::ImageWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}

/// Write a file that carries an image extension but no decodable content.
pub fn write_corrupt_file(dir: &Path, name: &str) -> TestResult<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, b"this is not an image")?;
    Ok(path)
}

/// Populate `dir` with `count` noisy leaves around `base`.
///
/// Files are named `{prefix}_{index:03}.png`; each leaf uses its own seed
/// derived from `seed` so the collection is reproducible.
pub fn write_leaf_collection(
    dir: &Path,
    prefix: &str,
    base: (u8, u8, u8),
    count: usize,
    seed: u64,
) -> TestResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    (0..count)
        .map(|i| {
            let image = noisy_leaf(64, 48, base, 12, seed.wrapping_add(i as u64))?;
            write_png_fixture(dir, &format!("{}_{:03}.png", prefix, i), &image)
        })
        .collect()
}

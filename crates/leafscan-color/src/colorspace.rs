//! Color space conversion
//!
//! # HSV
//!
//! Hue is stored in half-degrees so that a full turn fits in a byte:
//! `h` is in [0, 180), `s` and `v` in [0, 255]. The conversion divides
//! through reciprocal tables in 12-bit fixed point.
//!
//! # Luminance
//!
//! `Y = 0.299 R + 0.587 G + 0.114 B`, evaluated with 14-bit weights.

use crate::{ColorError, ColorResult};
use leafscan_core::{Image, PixelFormat};

const HSV_SHIFT: u32 = 12;
const HSV_ROUND: i32 = 1 << (HSV_SHIFT - 1);
/// Number of hue steps in a full turn
pub const HUE_RANGE: i32 = 180;

const GRAY_SHIFT: u32 = 14;
const R2Y: u32 = 4899;
const G2Y: u32 = 9617;
const B2Y: u32 = 1868;

/// `round((255 << 12) / i)`, 0 for `i == 0`
const SDIV_TABLE: [i32; 256] = reciprocal_table(255 << HSV_SHIFT);
/// `round((180 << 12) / (6 * i))`, 0 for `i == 0`
const HDIV_TABLE: [i32; 256] = reciprocal_table((HUE_RANGE << HSV_SHIFT) / 6);

const fn reciprocal_table(numerator: i32) -> [i32; 256] {
    let mut table = [0i32; 256];
    let mut i = 1;
    while i < 256 {
        table[i] = (2 * numerator + i as i32) / (2 * i as i32);
        i += 1;
    }
    table
}

/// An 8-bit HSV triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsv8 {
    /// Hue in half-degrees, [0, 180)
    pub h: u8,
    /// Saturation, [0, 255]
    pub s: u8,
    /// Value, [0, 255]
    pub v: u8,
}

/// Color channel selector for [`extract_channel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChannel {
    /// First stored sample (red or hue)
    First,
    /// Second stored sample (green or saturation)
    Second,
    /// Third stored sample (blue or value)
    Third,
}

impl ColorChannel {
    fn offset(self) -> usize {
        match self {
            ColorChannel::First => 0,
            ColorChannel::Second => 1,
            ColorChannel::Third => 2,
        }
    }
}

/// Mean of each HSV channel over all pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvMeans {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Convert one RGB pixel to luminance.
#[inline]
pub fn rgb_to_gray(r: u8, g: u8, b: u8) -> u8 {
    let y = u32::from(b) * B2Y + u32::from(g) * G2Y + u32::from(r) * R2Y;
    ((y + (1 << (GRAY_SHIFT - 1))) >> GRAY_SHIFT) as u8
}

/// Convert one RGB pixel to HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv8 {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let v = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let diff = v - vmin;

    let s = (diff * SDIV_TABLE[v as usize] + HSV_ROUND) >> HSV_SHIFT;

    let h = if v == r {
        g - b
    } else if v == g {
        b - r + 2 * diff
    } else {
        r - g + 4 * diff
    };
    let mut h = (h * HDIV_TABLE[diff as usize] + HSV_ROUND) >> HSV_SHIFT;
    if h < 0 {
        h += HUE_RANGE;
    }

    Hsv8 {
        h: h as u8,
        s: s as u8,
        v: v as u8,
    }
}

/// Convert an RGB image to HSV.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedFormat`] unless the input is `Rgb8`.
pub fn convert_rgb_to_hsv(image: &Image) -> ColorResult<Image> {
    if image.format() != PixelFormat::Rgb8 {
        return Err(ColorError::UnsupportedFormat {
            expected: "Rgb8",
            actual: image.format(),
        });
    }
    let data = image
        .data()
        .chunks_exact(3)
        .flat_map(|p| {
            let hsv = rgb_to_hsv(p[0], p[1], p[2]);
            [hsv.h, hsv.s, hsv.v]
        })
        .collect();
    Ok(Image::from_raw(
        image.width(),
        image.height(),
        PixelFormat::Hsv8,
        data,
    )?)
}

/// Convert an image to 8-bit luminance.
///
/// Gray input is returned as a shared clone.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedFormat`] for HSV input.
pub fn convert_to_gray(image: &Image) -> ColorResult<Image> {
    match image.format() {
        PixelFormat::Gray8 => Ok(image.clone()),
        PixelFormat::Rgb8 => {
            let data = image
                .data()
                .chunks_exact(3)
                .map(|p| rgb_to_gray(p[0], p[1], p[2]))
                .collect();
            Ok(Image::from_raw(
                image.width(),
                image.height(),
                PixelFormat::Gray8,
                data,
            )?)
        }
        other => Err(ColorError::UnsupportedFormat {
            expected: "Gray8 or Rgb8",
            actual: other,
        }),
    }
}

/// Extract one channel of a 3-channel image as a gray image.
pub fn extract_channel(image: &Image, channel: ColorChannel) -> ColorResult<Image> {
    if image.spp() != 3 {
        return Err(ColorError::UnsupportedFormat {
            expected: "3-channel image",
            actual: image.format(),
        });
    }
    let k = channel.offset();
    let data = image.data().chunks_exact(3).map(|p| p[k]).collect();
    Ok(Image::from_raw(
        image.width(),
        image.height(),
        PixelFormat::Gray8,
        data,
    )?)
}

/// Mean hue, saturation and value of an HSV image.
pub fn hsv_means(image: &Image) -> ColorResult<HsvMeans> {
    if image.format() != PixelFormat::Hsv8 {
        return Err(ColorError::UnsupportedFormat {
            expected: "Hsv8",
            actual: image.format(),
        });
    }
    let m = image.mean_per_channel();
    Ok(HsvMeans {
        h: m[0],
        s: m[1],
        v: m[2],
    })
}

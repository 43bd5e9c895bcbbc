//! Image scaling operations
//!
//! Bilinear resampling uses half-pixel centers (`src = (dst + 0.5) * scale - 0.5`)
//! with 11-bit fixed-point tap weights, clamping at the right and bottom
//! edges. An exact 2x reduction in both directions averages 2x2 blocks
//! instead, as the usual bilinear resize does for that factor.
//!
//! Every channel is resampled independently, so gray and RGB images are
//! both accepted.

use crate::{TransformError, TransformResult};
use leafscan_core::Image;

/// Fractional bits of the interpolation weights
const COEF_BITS: u32 = 11;
const COEF_SCALE: f32 = (1 << COEF_BITS) as f32;
/// Two weight factors are applied, so the product carries twice the bits.
const CAST_BITS: u32 = COEF_BITS * 2;

/// Scaling method to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMethod {
    /// Nearest-neighbor sampling
    Sampling,
    /// Bilinear interpolation
    #[default]
    Linear,
}

/// Scale an image to a specific size with bilinear interpolation.
///
/// A target dimension of 0 keeps the aspect ratio of the source.
///
/// # Errors
///
/// Returns [`TransformError::InvalidSize`] if both dimensions are 0.
pub fn scale_to_size(image: &Image, width: u32, height: u32) -> TransformResult<Image> {
    scale_to_size_with_method(image, width, height, ScaleMethod::Linear)
}

/// Scale an image to a specific size with the given method.
pub fn scale_to_size_with_method(
    image: &Image,
    width: u32,
    height: u32,
    method: ScaleMethod,
) -> TransformResult<Image> {
    let (dst_w, dst_h) = resolve_size(image.width(), image.height(), width, height)?;

    if dst_w == image.width() && dst_h == image.height() {
        return Ok(image.deep_clone());
    }

    let data = match method {
        ScaleMethod::Sampling => resize_nearest(image, dst_w, dst_h),
        ScaleMethod::Linear if dst_w * 2 == image.width() && dst_h * 2 == image.height() => {
            reduce_2x(image, dst_w, dst_h)
        }
        ScaleMethod::Linear => resize_linear(image, dst_w, dst_h),
    };

    Ok(Image::from_raw(dst_w, dst_h, image.format(), data)?)
}

fn resolve_size(src_w: u32, src_h: u32, width: u32, height: u32) -> TransformResult<(u32, u32)> {
    match (width, height) {
        (0, 0) => Err(TransformError::InvalidSize(
            "width and height cannot both be 0".to_string(),
        )),
        (0, h) => {
            let w = (f64::from(src_w) * f64::from(h) / f64::from(src_h)).round() as u32;
            Ok((w.max(1), h))
        }
        (w, 0) => {
            let h = (f64::from(src_h) * f64::from(w) / f64::from(src_w)).round() as u32;
            Ok((w, h.max(1)))
        }
        (w, h) => Ok((w, h)),
    }
}

/// Source indices and fixed-point weights for one output coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tap {
    index: [usize; 2],
    weight: [i64; 2],
}

fn linear_taps(src_len: u32, dst_len: u32) -> Vec<Tap> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    let last = src_len as i64 - 1;
    (0..dst_len)
        .map(|d| {
            let f = ((f64::from(d) + 0.5) * scale - 0.5) as f32;
            let mut s = f.floor() as i64;
            let mut frac = f - s as f32;
            if s < 0 {
                s = 0;
                frac = 0.0;
            }
            if s >= last {
                s = last;
                frac = 0.0;
            }
            let w0 = ((1.0 - frac) * COEF_SCALE).round_ties_even() as i64;
            let w1 = (frac * COEF_SCALE).round_ties_even() as i64;
            let s = s as usize;
            Tap {
                index: [s, (s + 1).min(last as usize)],
                weight: [w0, w1],
            }
        })
        .collect()
}

fn resize_linear(image: &Image, dst_w: u32, dst_h: u32) -> Vec<u8> {
    let spp = image.spp() as usize;
    let x_taps = linear_taps(image.width(), dst_w);
    let y_taps = linear_taps(image.height(), dst_h);
    let row_len = dst_w as usize * spp;

    // Horizontal pass, only for source rows some output row reads.
    let mut needed = vec![false; image.height() as usize];
    for tap in &y_taps {
        needed[tap.index[0]] = true;
        needed[tap.index[1]] = true;
    }
    let hrows: Vec<Vec<i64>> = needed
        .iter()
        .enumerate()
        .map(|(y, &used)| {
            if !used {
                return Vec::new();
            }
            let src = image.row(y as u32);
            let mut out = Vec::with_capacity(row_len);
            for tap in &x_taps {
                let (i0, i1) = (tap.index[0] * spp, tap.index[1] * spp);
                for c in 0..spp {
                    out.push(
                        i64::from(src[i0 + c]) * tap.weight[0]
                            + i64::from(src[i1 + c]) * tap.weight[1],
                    );
                }
            }
            out
        })
        .collect();

    let mut data = Vec::with_capacity(row_len * dst_h as usize);
    let round = 1i64 << (CAST_BITS - 1);
    for tap in &y_taps {
        let r0 = &hrows[tap.index[0]];
        let r1 = &hrows[tap.index[1]];
        for (a, b) in r0.iter().zip(r1) {
            let v = (a * tap.weight[0] + b * tap.weight[1] + round) >> CAST_BITS;
            data.push(v.clamp(0, 255) as u8);
        }
    }
    data
}

fn reduce_2x(image: &Image, dst_w: u32, dst_h: u32) -> Vec<u8> {
    let spp = image.spp() as usize;
    let mut data = Vec::with_capacity(dst_w as usize * dst_h as usize * spp);
    for dy in 0..dst_h {
        let top = image.row(dy * 2);
        let bottom = image.row(dy * 2 + 1);
        for dx in 0..dst_w as usize {
            let i = dx * 2 * spp;
            for c in 0..spp {
                let sum = u32::from(top[i + c])
                    + u32::from(top[i + spp + c])
                    + u32::from(bottom[i + c])
                    + u32::from(bottom[i + spp + c]);
                data.push(((sum + 2) >> 2) as u8);
            }
        }
    }
    data
}

fn resize_nearest(image: &Image, dst_w: u32, dst_h: u32) -> Vec<u8> {
    let spp = image.spp() as usize;
    let sx = f64::from(image.width()) / f64::from(dst_w);
    let sy = f64::from(image.height()) / f64::from(dst_h);
    let xs: Vec<usize> = (0..dst_w)
        .map(|dx| ((f64::from(dx) * sx).floor() as u32).min(image.width() - 1) as usize)
        .collect();

    let mut data = Vec::with_capacity(dst_w as usize * dst_h as usize * spp);
    for dy in 0..dst_h {
        let y = ((f64::from(dy) * sy).floor() as u32).min(image.height() - 1);
        let src = image.row(y);
        for &x in &xs {
            data.extend_from_slice(&src[x * spp..(x + 1) * spp]);
        }
    }
    data
}

//! Separable convolution
//!
//! Both passes run in integer arithmetic: the horizontal pass keeps
//! 8 fractional bits, the vertical pass 16, and the result is rounded
//! back to a byte. Pixels outside the image are mirrored without
//! repeating the edge pixel (`dcb|abcd|cba`).

use crate::kernel::{KERNEL_BITS, Kernel};
use crate::{FilterError, FilterResult};
use leafscan_core::{Image, PixelFormat};

/// Map a possibly out-of-range coordinate into `0..len` by mirroring
/// around the edge pixels.
pub(crate) fn reflect_101(mut i: i64, len: usize) -> usize {
    let n = len as i64;
    if n == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * (n - 1) - i;
        } else {
            return i as usize;
        }
    }
}

/// Convolve a gray image with a horizontal and a vertical kernel.
///
/// # Errors
///
/// Returns [`FilterError::UnsupportedFormat`] unless the input is `Gray8`.
pub fn convolve_sep(image: &Image, kernel_x: &Kernel, kernel_y: &Kernel) -> FilterResult<Image> {
    if image.format() != PixelFormat::Gray8 {
        return Err(FilterError::UnsupportedFormat {
            expected: "Gray8",
            actual: image.format(),
        });
    }

    let w = image.width() as usize;
    let h = image.height() as usize;
    let kx = kernel_x.to_fixed();
    let ky = kernel_y.to_fixed();
    let rx = kernel_x.radius() as i64;
    let ry = kernel_y.radius() as i64;

    let xmap: Vec<Vec<usize>> = (0..w as i64)
        .map(|x| (-rx..=rx).map(|d| reflect_101(x + d, w)).collect())
        .collect();

    let mut horiz = vec![0u32; w * h];
    for y in 0..h {
        let src = image.row(y as u32);
        let out = &mut horiz[y * w..(y + 1) * w];
        for (x, taps) in xmap.iter().enumerate() {
            out[x] = taps
                .iter()
                .zip(&kx)
                .map(|(&sx, &k)| u32::from(src[sx]) * k)
                .sum();
        }
    }

    let round = 1u64 << (2 * KERNEL_BITS - 1);
    let mut data = vec![0u8; w * h];
    for y in 0..h as i64 {
        let rows: Vec<usize> = (-ry..=ry).map(|d| reflect_101(y + d, h)).collect();
        let out = &mut data[y as usize * w..(y as usize + 1) * w];
        for (x, px) in out.iter_mut().enumerate() {
            let acc: u64 = rows
                .iter()
                .zip(&ky)
                .map(|(&sy, &k)| u64::from(horiz[sy * w + x]) * u64::from(k))
                .sum();
            *px = ((acc + round) >> (2 * KERNEL_BITS)).min(255) as u8;
        }
    }

    Ok(Image::from_raw(
        image.width(),
        image.height(),
        PixelFormat::Gray8,
        data,
    )?)
}

/// Gaussian blur with a square `size x size` window.
///
/// `sigma <= 0` derives the width from `size`.
pub fn gaussian_blur(image: &Image, size: u32, sigma: f64) -> FilterResult<Image> {
    let kernel = Kernel::gaussian(size, sigma)?;
    convolve_sep(image, &kernel, &kernel)
}

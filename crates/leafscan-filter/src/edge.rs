//! Edge detection
//!
//! [`canny`] follows the classic four steps:
//!
//! 1. 3x3 Sobel gradients, replicating the edge pixels outward
//! 2. L1 gradient magnitude `|dx| + |dy|`
//! 3. Non-maximum suppression along the gradient direction, quantized
//!    to 0, 45, 90 or 135 degrees with 15-bit fixed-point tangents
//! 4. Hysteresis: pixels above `high` seed edges that grow through
//!    8-connected pixels above `low`
//!
//! The output is a gray image holding 255 on edges and 0 elsewhere.

use crate::{FilterError, FilterResult};
use leafscan_core::{Image, PixelFormat};

const CANNY_SHIFT: u32 = 15;
/// `tan(22.5 deg)` in 15-bit fixed point
const TG22: i64 = 13573;

/// Value written for edge pixels
pub const EDGE_VALUE: u8 = 255;

/// Horizontal and vertical Sobel responses of a gray image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradients {
    pub width: usize,
    pub height: usize,
    pub dx: Vec<i32>,
    pub dy: Vec<i32>,
}

impl Gradients {
    /// L1 magnitude at every pixel.
    pub fn l1_magnitude(&self) -> Vec<i32> {
        self.dx
            .iter()
            .zip(&self.dy)
            .map(|(x, y)| x.abs() + y.abs())
            .collect()
    }
}

fn require_gray(image: &Image) -> FilterResult<()> {
    if image.format() != PixelFormat::Gray8 {
        return Err(FilterError::UnsupportedFormat {
            expected: "Gray8",
            actual: image.format(),
        });
    }
    Ok(())
}

/// Compute 3x3 Sobel gradients.
///
/// `dx` responds to left-to-right increases, `dy` to top-to-bottom ones.
pub fn sobel_gradients(image: &Image) -> FilterResult<Gradients> {
    require_gray(image)?;
    let w = image.width() as usize;
    let h = image.height() as usize;
    let data = image.data();
    let at = |x: i64, y: i64| -> i32 {
        let x = x.clamp(0, w as i64 - 1) as usize;
        let y = y.clamp(0, h as i64 - 1) as usize;
        i32::from(data[y * w + x])
    };

    let mut dx = vec![0i32; w * h];
    let mut dy = vec![0i32; w * h];
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let (tl, tc, tr) = (at(x - 1, y - 1), at(x, y - 1), at(x + 1, y - 1));
            let (ml, mr) = (at(x - 1, y), at(x + 1, y));
            let (bl, bc, br) = (at(x - 1, y + 1), at(x, y + 1), at(x + 1, y + 1));
            let i = y as usize * w + x as usize;
            dx[i] = (tr + 2 * mr + br) - (tl + 2 * ml + bl);
            dy[i] = (bl + 2 * bc + br) - (tl + 2 * tc + tr);
        }
    }

    Ok(Gradients {
        width: w,
        height: h,
        dx,
        dy,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Candidate,
    Edge,
}

/// Two-threshold edge detection.
///
/// Thresholds are compared against the L1 gradient magnitude and are
/// swapped if given in the wrong order.
///
/// # Errors
///
/// Returns [`FilterError::UnsupportedFormat`] for non-gray input and
/// [`FilterError::InvalidParameters`] for negative or non-finite thresholds.
pub fn canny(image: &Image, low: f64, high: f64) -> FilterResult<Image> {
    require_gray(image)?;
    if !(low.is_finite() && high.is_finite()) || low < 0.0 || high < 0.0 {
        return Err(FilterError::InvalidParameters(format!(
            "canny thresholds must be finite and non-negative, got {} and {}",
            low, high
        )));
    }
    let (low, high) = if low > high { (high, low) } else { (low, high) };
    let low = low.floor() as i32;
    let high = high.floor() as i32;

    let grad = sobel_gradients(image)?;
    let (w, h) = (grad.width, grad.height);
    let mag = grad.l1_magnitude();
    // Magnitude outside the image reads as zero.
    let m_at = |x: i64, y: i64| -> i32 {
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            0
        } else {
            mag[y as usize * w + x as usize]
        }
    };

    let mut marks = vec![Mark::None; w * h];
    let mut stack = Vec::new();
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let i = y as usize * w + x as usize;
            let m = mag[i];
            if m <= low {
                continue;
            }
            let xs = i64::from(grad.dx[i]);
            let ys = i64::from(grad.dy[i]);
            let ax = xs.abs();
            let ay = ys.abs() << CANNY_SHIFT;
            let tg22x = ax * TG22;

            let is_max = if ay < tg22x {
                m > m_at(x - 1, y) && m >= m_at(x + 1, y)
            } else {
                let tg67x = tg22x + (ax << (CANNY_SHIFT + 1));
                if ay > tg67x {
                    m > m_at(x, y - 1) && m >= m_at(x, y + 1)
                } else {
                    let s = if (xs ^ ys) < 0 { -1 } else { 1 };
                    m > m_at(x - s, y - 1) && m > m_at(x + s, y + 1)
                }
            };
            if !is_max {
                continue;
            }
            if m > high {
                marks[i] = Mark::Edge;
                stack.push(i);
            } else {
                marks[i] = Mark::Candidate;
            }
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = ((i % w) as i64, (i / w) as i64);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if marks[j] == Mark::Candidate {
                    marks[j] = Mark::Edge;
                    stack.push(j);
                }
            }
        }
    }

    let data = marks
        .iter()
        .map(|&m| if m == Mark::Edge { EDGE_VALUE } else { 0 })
        .collect();
    Ok(Image::from_raw(
        image.width(),
        image.height(),
        PixelFormat::Gray8,
        data,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32, data: Vec<u8>) -> Image {
        Image::from_raw(width, height, PixelFormat::Gray8, data).unwrap()
    }

    fn vertical_step(width: u32, height: u32, at: u32, lo: u8, hi: u8) -> Image {
        let mut data = Vec::with_capacity((width * height) as usize);
        for _ in 0..height {
            for x in 0..width {
                data.push(if x < at { lo } else { hi });
            }
        }
        gray(width, height, data)
    }

    #[test]
    fn test_sobel_step() {
        let image = vertical_step(6, 3, 3, 0, 10);
        let g = sobel_gradients(&image).unwrap();
        // Columns 2 and 3 straddle the step: 10 * (1 + 2 + 1)
        assert_eq!(g.dx[6 + 2], 40);
        assert_eq!(g.dx[6 + 3], 40);
        assert_eq!(g.dx[6], 0);
        assert!(g.dy.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_sobel_replicates_border() {
        let image = vertical_step(4, 4, 1, 0, 100);
        let g = sobel_gradients(&image).unwrap();
        // x = 0 sees itself on the left and x = 1 on the right
        assert_eq!(g.dx[0], 400);
    }

    #[test]
    fn test_canny_flat_has_no_edges() {
        let image = gray(20, 20, vec![90; 400]);
        let edges = canny(&image, 100.0, 200.0).unwrap();
        assert!(edges.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_canny_strong_step_single_column() {
        let image = vertical_step(20, 10, 10, 0, 200);
        let edges = canny(&image, 100.0, 200.0).unwrap();
        // Columns 9 and 10 tie at 800; the left one wins (strict >, then >=)
        for y in 0..10 {
            for x in 0..20 {
                let expected = if x == 9 { EDGE_VALUE } else { 0 };
                assert_eq!(edges.get_gray(x, y), Some(expected), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_canny_weak_step_rejected() {
        // Magnitude 4 * 40 = 160: above low but never above high
        let image = vertical_step(20, 10, 10, 0, 40);
        let edges = canny(&image, 100.0, 200.0).unwrap();
        assert!(edges.data().iter().all(|&v| v == 0));
        let edges = canny(&image, 100.0, 150.0).unwrap();
        assert_eq!(edges.sum_gray(), Some(255 * 10));
    }

    #[test]
    fn test_canny_output_binary() {
        let mut data = Vec::new();
        for y in 0..32u32 {
            for x in 0..32u32 {
                data.push(((x * 37 + y * 91) % 256) as u8);
            }
        }
        let edges = canny(&gray(32, 32, data), 100.0, 200.0).unwrap();
        assert!(edges.data().iter().all(|&v| v == 0 || v == EDGE_VALUE));
    }

    #[test]
    fn test_canny_threshold_validation() {
        let image = gray(4, 4, vec![0; 16]);
        assert!(canny(&image, -1.0, 10.0).is_err());
        assert!(canny(&image, f64::NAN, 10.0).is_err());
        // swapped order is accepted
        assert!(canny(&image, 200.0, 100.0).is_ok());
    }
}

//! Edge detection regression test
//!
//! Runs smoothing and Canny on the luminance of synthetic leaves and
//! checks the invariants the feature extractor relies on.

use leafscan_color::convert_to_gray;
use leafscan_core::{Image, PixelFormat};
use leafscan_filter::{canny, gaussian_blur, sobel_gradients};
use leafscan_test::{HEALTHY_GREEN, RegParams, noisy_leaf, solid_rgb};

fn leaf_against_shadow() -> Image {
    // Left half green leaf, right half dark background, 200x200
    let (gr, gg, gb) = HEALTHY_GREEN;
    let (br, bg, bb) = (10, 20, 10);
    let mut image = Image::new(200, 200, PixelFormat::Rgb8).unwrap().to_mut();
    for y in 0..200 {
        for x in 0..200 {
            if x < 100 {
                image.set_rgb(x, y, gr, gg, gb).unwrap();
            } else {
                image.set_rgb(x, y, br, bg, bb).unwrap();
            }
        }
    }
    image.into()
}

#[test]
fn edge_reg() {
    let mut rp = RegParams::new("edge");

    // --- Test 1: flat leaf has no edges ---
    let flat = convert_to_gray(&solid_rgb(200, 200, 40, 170, 50).unwrap()).unwrap();
    let edges = canny(&flat, 100.0, 200.0).unwrap();
    rp.compare_values(0.0, edges.sum_gray().unwrap() as f64, 0.0);

    // --- Test 2: a color boundary becomes one edge column ---
    let gray = convert_to_gray(&leaf_against_shadow()).unwrap();
    let step = i32::from(gray.get_gray(0, 0).unwrap()) - i32::from(gray.get_gray(199, 0).unwrap());
    eprintln!("  luminance step across boundary: {}", step);
    rp.compare_values(101.0, step as f64, 0.0);
    let edges = canny(&gray, 100.0, 200.0).unwrap();
    let sum = edges.sum_gray().unwrap() as f64;
    eprintln!("  edge sum: {}", sum);
    rp.compare_values(255.0 * 200.0, sum, 0.0);

    // --- Test 3: noise produces some edges, output stays binary ---
    let leaf = convert_to_gray(&noisy_leaf(200, 200, HEALTHY_GREEN, 60, 5).unwrap()).unwrap();
    let edges = canny(&leaf, 100.0, 200.0).unwrap();
    rp.check(
        edges.data().iter().all(|&v| v == 0 || v == 255),
        "edge map is binary",
    );
    let noisy_sum = edges.sum_gray().unwrap();
    eprintln!("  noisy leaf edge sum: {}", noisy_sum);
    rp.check(noisy_sum > 0, "noise yields edges");

    // --- Test 4: blurring removes most of that noise ---
    let blurred = gaussian_blur(&leaf, 7, 0.0).unwrap();
    let blurred_edges = canny(&blurred, 100.0, 200.0).unwrap();
    rp.check(
        blurred_edges.sum_gray().unwrap() < noisy_sum,
        "blur suppresses noise edges",
    );

    // --- Test 5: blur keeps the mean ---
    let before = leaf.mean_per_channel()[0];
    let after = blurred.mean_per_channel()[0];
    rp.compare_values(before, after, 0.5);

    // --- Test 6: gradients are zero on a flat image ---
    let g = sobel_gradients(&flat).unwrap();
    rp.check(g.l1_magnitude().iter().all(|&m| m == 0), "flat gradient");

    // --- Test 7: color input is rejected ---
    let rgb = solid_rgb(8, 8, 1, 2, 3).unwrap();
    rp.check(canny(&rgb, 100.0, 200.0).is_err(), "rgb rejected");

    assert!(rp.cleanup());
}

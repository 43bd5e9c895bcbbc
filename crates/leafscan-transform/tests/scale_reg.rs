//! Scale regression test
//!
//! Resizes synthetic leaves of awkward sizes onto the 200x200 analysis
//! canvas and checks geometry and value preservation.

use leafscan_test::{HEALTHY_GREEN, RegParams, gray_ramp, noisy_leaf, solid_rgb};
use leafscan_transform::{ScaleMethod, scale_to_size, scale_to_size_with_method};

#[test]
fn scale_reg() {
    let mut rp = RegParams::new("scale");

    // --- Test 1: downscale an odd-sized leaf ---
    let leaf = noisy_leaf(517, 389, HEALTHY_GREEN, 20, 11).unwrap();
    let canvas = scale_to_size(&leaf, 200, 200).unwrap();
    rp.compare_values(200.0, canvas.width() as f64, 0.0);
    rp.compare_values(200.0, canvas.height() as f64, 0.0);
    rp.check(canvas.format() == leaf.format(), "format preserved");

    // Averages survive resampling of a noise field around a fixed color
    let before = leaf.mean_per_channel();
    let after = canvas.mean_per_channel();
    for (b, a) in before.iter().zip(&after) {
        eprintln!("  channel mean {:.2} -> {:.2}", b, a);
        rp.compare_values(*b, *a, 1.5);
    }

    // --- Test 2: upscale a tiny image ---
    let tiny = solid_rgb(3, 5, 90, 60, 30).unwrap();
    let up = scale_to_size(&tiny, 200, 200).unwrap();
    rp.check(
        up.data().chunks_exact(3).all(|p| p == [90, 60, 30]),
        "solid color preserved on upscale",
    );

    // --- Test 3: exact 2x reduction ---
    let ramp = gray_ramp(400, 400).unwrap();
    let half = scale_to_size(&ramp, 200, 200).unwrap();
    rp.compare_values(0.0, half.get_gray(0, 0).unwrap() as f64, 1.0);
    rp.compare_values(255.0, half.get_gray(199, 199).unwrap() as f64, 1.0);

    // --- Test 4: determinism ---
    let again = scale_to_size(&leaf, 200, 200).unwrap();
    rp.compare_images(&canvas, &again);

    // --- Test 5: sampling picks source values only ---
    let sampled = scale_to_size_with_method(&ramp, 7, 3, ScaleMethod::Sampling).unwrap();
    rp.check(
        sampled.row(0).iter().all(|v| ramp.row(0).contains(v)),
        "sampled values come from the source",
    );

    assert!(rp.cleanup());
}

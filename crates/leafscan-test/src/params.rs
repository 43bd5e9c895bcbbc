//! Regression test parameters and comparisons

use leafscan_core::Image;

/// Regression test parameters
///
/// Tracks the state of one regression test: its name, the index of the
/// current check, and every failure seen so far. Checks never panic; call
/// [`RegParams::cleanup`] at the end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "features")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters and print the banner.
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        // NaN never compares within delta
        if !(diff <= delta) {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg);
            false
        } else {
            true
        }
    }

    /// Record a boolean check
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if !condition {
            let msg = format!(
                "Failure in {}_reg: check {} failed: {}",
                self.test_name, self.index, what
            );
            self.fail(msg);
        }
        condition
    }

    /// Compare two images for exact equality
    pub fn compare_images(&mut self, image1: &Image, image2: &Image) -> bool {
        self.index += 1;

        if !image1.sizes_equal(image2) {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - geometry mismatch \
                 ({}x{} {:?} vs {}x{} {:?})",
                self.test_name,
                self.index,
                image1.width(),
                image1.height(),
                image1.format(),
                image2.width(),
                image2.height(),
                image2.format()
            );
            self.fail(msg);
            return false;
        }

        if let Some(pos) = image1
            .data()
            .iter()
            .zip(image2.data())
            .position(|(a, b)| a != b)
        {
            let pixel = pos / image1.spp() as usize;
            let x = pixel % image1.width() as usize;
            let y = pixel / image1.width() as usize;
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - sample mismatch at ({}, {})",
                self.test_name, self.index, x, y
            );
            self.fail(msg);
            return false;
        }

        true
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

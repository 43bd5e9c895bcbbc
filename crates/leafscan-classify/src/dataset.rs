//! Labeled dataset construction
//!
//! [`DatasetBuilder`] walks a healthy and an unhealthy image directory,
//! extracts a [`FeatureVector`] from every supported file and labels it by
//! the directory it came from. Unreadable or degenerate images are logged
//! and skipped, never fatal.

use crate::error::{DatasetError, SampleError};
use crate::label::Label;
use leafscan_features::{ExtractOptions, FEATURE_DIM, FeatureVector, extract_with_options};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File extensions accepted as images, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// One labeled feature vector and the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub label: Label,
    pub source: PathBuf,
}

/// A file that was excluded from the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub source: PathBuf,
    pub reason: String,
}

/// An ordered, immutable collection of labeled samples
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    samples: Vec<LabeledSample>,
    skipped: Vec<SkippedItem>,
    options: ExtractOptions,
}

impl Dataset {
    /// Build a dataset from samples already in memory.
    ///
    /// The samples are assumed to come from default [`ExtractOptions`].
    pub fn from_samples(samples: Vec<LabeledSample>) -> Self {
        Self {
            samples,
            ..Self::default()
        }
    }

    /// Extraction parameters the feature vectors were made with.
    pub fn extract_options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    /// Files that were found but could not be used.
    pub fn skipped(&self) -> &[SkippedItem] {
        &self.skipped
    }

    /// Number of samples carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.samples.iter().filter(|s| s.label == label).count()
    }

    /// Feature matrix with one row per sample.
    pub fn features(&self) -> Array2<f64> {
        feature_matrix(self.samples.iter())
    }

    /// Label codes aligned with [`Dataset::features`].
    pub fn labels(&self) -> Array1<u8> {
        self.samples.iter().map(|s| s.label.code()).collect()
    }

    /// Source paths aligned with [`Dataset::features`].
    pub fn sources(&self) -> Vec<&Path> {
        self.samples.iter().map(|s| s.source.as_path()).collect()
    }
}

pub(crate) fn feature_matrix<'a, I>(samples: I) -> Array2<f64>
where
    I: ExactSizeIterator<Item = &'a LabeledSample>,
{
    let n = samples.len();
    let mut out = Array2::zeros((n, FEATURE_DIM));
    for (mut row, sample) in out.rows_mut().into_iter().zip(samples) {
        for (dst, &v) in row.iter_mut().zip(sample.features.as_slice()) {
            *dst = v;
        }
    }
    out
}

/// Read an image file and extract its feature vector.
pub fn load_sample(path: &Path, options: &ExtractOptions) -> Result<FeatureVector, SampleError> {
    let image = leafscan_io::read_image(path)?;
    Ok(extract_with_options(&image, options)?)
}

/// Whether `path` has one of [`IMAGE_EXTENSIONS`].
pub fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
}

/// List the supported image files directly inside `dir`, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    if !dir.is_dir() {
        return Err(DatasetError::MissingDirectory(dir.to_path_buf()));
    }
    let io_err = |source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && has_image_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Builds a [`Dataset`] from a healthy and an unhealthy directory
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    healthy_dir: PathBuf,
    unhealthy_dir: PathBuf,
    options: ExtractOptions,
    parallel: bool,
}

impl DatasetBuilder {
    pub fn new(healthy_dir: impl Into<PathBuf>, unhealthy_dir: impl Into<PathBuf>) -> Self {
        Self {
            healthy_dir: healthy_dir.into(),
            unhealthy_dir: unhealthy_dir.into(),
            options: ExtractOptions::default(),
            parallel: true,
        }
    }

    /// Use non-default extraction parameters.
    pub fn options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Extract on the rayon pool (default) or on the calling thread.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn extract_options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract every image and assemble the dataset.
    ///
    /// All healthy samples precede all unhealthy ones; within a class,
    /// samples are in path order. The result may be empty.
    ///
    /// # Errors
    ///
    /// Fails only if a directory is missing or cannot be listed.
    /// Per-image failures are recorded in [`Dataset::skipped`].
    pub fn build(&self) -> Result<Dataset, DatasetError> {
        let healthy = list_images(&self.healthy_dir)?;
        let unhealthy = list_images(&self.unhealthy_dir)?;
        debug!(
            healthy = healthy.len(),
            unhealthy = unhealthy.len(),
            "found candidate images"
        );

        let mut dataset = Dataset {
            options: self.options,
            ..Dataset::default()
        };
        for (label, paths) in [(Label::Healthy, healthy), (Label::Unhealthy, unhealthy)] {
            for (path, result) in paths.iter().zip(self.extract_all(&paths)) {
                match result {
                    Ok(features) => dataset.samples.push(LabeledSample {
                        features,
                        label,
                        source: path.clone(),
                    }),
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "skipping image");
                        dataset.skipped.push(SkippedItem {
                            source: path.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            samples = dataset.len(),
            healthy = dataset.count(Label::Healthy),
            unhealthy = dataset.count(Label::Unhealthy),
            skipped = dataset.skipped.len(),
            "dataset built"
        );
        Ok(dataset)
    }

    fn extract_all(&self, paths: &[PathBuf]) -> Vec<Result<FeatureVector, SampleError>> {
        if self.parallel {
            paths
                .par_iter()
                .map(|p| load_sample(p, &self.options))
                .collect()
        } else {
            paths
                .iter()
                .map(|p| load_sample(p, &self.options))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafscan_test::{HEALTHY_GREEN, NECROTIC_BROWN, write_corrupt_file, write_leaf_collection};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    /// Records the `path` field of every WARN event.
    #[derive(Clone, Default)]
    struct WarnedPaths(Arc<Mutex<Vec<String>>>);

    struct PathField(String);

    impl Visit for PathField {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "path" {
                self.0 = format!("{:?}", value);
            }
        }
    }

    impl<S: Subscriber> Layer<S> for WarnedPaths {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                let mut path = PathField(String::new());
                event.record(&mut path);
                self.0.lock().push(path.0);
            }
        }
    }

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("a/leaf.PNG")));
        assert!(has_image_extension(Path::new("leaf.Jpeg")));
        assert!(has_image_extension(Path::new("leaf.jpg")));
        assert!(!has_image_extension(Path::new("leaf.gif")));
        assert!(!has_image_extension(Path::new("README")));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = DatasetBuilder::new(&missing, dir.path())
            .build()
            .unwrap_err();
        match err {
            DatasetError::MissingDirectory(p) => assert_eq!(p, missing),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_labels_are_positional() {
        let root = tempfile::tempdir().unwrap();
        let healthy = root.path().join("healthy");
        let unhealthy = root.path().join("unhealthy");
        std::fs::create_dir_all(&healthy).unwrap();
        std::fs::create_dir_all(&unhealthy).unwrap();
        write_leaf_collection(&healthy, "h", HEALTHY_GREEN, 3, 1).unwrap();
        write_leaf_collection(&unhealthy, "u", NECROTIC_BROWN, 2, 2).unwrap();
        std::fs::write(healthy.join("notes.txt"), b"not an image").unwrap();

        let dataset = DatasetBuilder::new(&healthy, &unhealthy).build().unwrap();
        assert_eq!(dataset.len(), 5);
        assert!(dataset.skipped().is_empty());
        assert_eq!(dataset.labels().to_vec(), vec![1, 1, 1, 0, 0]);
        assert_eq!(dataset.features().dim(), (5, FEATURE_DIM));
        assert!(dataset.sources()[0].ends_with("h_000.png"));
        assert!(dataset.sources()[4].ends_with("u_001.png"));
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let healthy = root.path().join("healthy");
        let unhealthy = root.path().join("unhealthy");
        std::fs::create_dir_all(&healthy).unwrap();
        std::fs::create_dir_all(&unhealthy).unwrap();
        write_leaf_collection(&healthy, "h", HEALTHY_GREEN, 3, 3).unwrap();
        let bad = write_corrupt_file(&healthy, "h_bad.jpg").unwrap();

        let warned = WarnedPaths::default();
        let subscriber = tracing_subscriber::registry().with(warned.clone());
        let dataset = tracing::subscriber::with_default(subscriber, || {
            DatasetBuilder::new(&healthy, &unhealthy)
                .parallel(false)
                .build()
                .unwrap()
        });
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.skipped().len(), 1);
        assert_eq!(dataset.skipped()[0].source, bad);
        assert_eq!(*warned.0.lock(), vec![bad.display().to_string()]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("leaves");
        std::fs::create_dir_all(&dir).unwrap();
        write_leaf_collection(&dir, "x", HEALTHY_GREEN, 6, 9).unwrap();
        let empty = root.path().join("empty");
        std::fs::create_dir_all(&empty).unwrap();

        let par = DatasetBuilder::new(&dir, &empty).build().unwrap();
        let seq = DatasetBuilder::new(&dir, &empty)
            .parallel(false)
            .build()
            .unwrap();
        assert_eq!(par.samples(), seq.samples());
    }
}

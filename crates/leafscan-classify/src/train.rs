//! Classifier training and held-out evaluation
//!
//! The dataset is split with a seeded shuffle, a Gaussian-kernel SVM with
//! Platt-scaled probability outputs is fitted on the training partition,
//! and the held-out partition is scored. Training always starts from
//! scratch.

use crate::dataset::{Dataset, LabeledSample, feature_matrix};
use crate::error::{InferenceError, TrainError};
use crate::label::Label;
use crate::metrics::Evaluation;
use crate::model::TrainedModel;
use crate::split::train_test_split;
use linfa::DatasetBase;
use linfa::prelude::Pr;
use linfa::traits::Fit;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How the Gaussian kernel width is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelWidth {
    /// `n_features * var(X_train)` over all training entries
    Scale,
    /// A fixed `eps` in `exp(-|x - y|^2 / eps)`
    Fixed(f64),
}

impl KernelWidth {
    /// Kernel `eps` for the training matrix `x`.
    ///
    /// `Scale` falls back to 1 when the training data has no variance.
    pub fn resolve(&self, x: &Array2<f64>) -> f64 {
        match *self {
            KernelWidth::Fixed(eps) => eps,
            KernelWidth::Scale => {
                let mean = x.mean().unwrap_or(0.0);
                let var = x.mapv(|v| (v - mean) * (v - mean)).mean().unwrap_or(0.0);
                let eps = x.ncols() as f64 * var;
                if eps.is_finite() && eps > 0.0 {
                    eps
                } else {
                    1.0
                }
            }
        }
    }
}

/// Training parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    /// Fraction of samples held out for evaluation
    pub test_ratio: f64,
    /// Seed of the split shuffle
    pub seed: u64,
    pub kernel_width: KernelWidth,
    /// Soft-margin penalty for healthy samples
    pub c_healthy: f64,
    /// Soft-margin penalty for unhealthy samples
    pub c_unhealthy: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            kernel_width: KernelWidth::Scale,
            c_healthy: 1.0,
            c_unhealthy: 1.0,
        }
    }
}

impl TrainOptions {
    pub fn validate(&self) -> Result<(), TrainError> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(TrainError::InvalidOptions(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        for (name, c) in [
            ("c_healthy", self.c_healthy),
            ("c_unhealthy", self.c_unhealthy),
        ] {
            if !(c.is_finite() && c > 0.0) {
                return Err(TrainError::InvalidOptions(format!(
                    "{} must be positive, got {}",
                    name, c
                )));
            }
        }
        if let KernelWidth::Fixed(eps) = self.kernel_width
            && !(eps.is_finite() && eps > 0.0)
        {
            return Err(TrainError::InvalidOptions(format!(
                "kernel eps must be positive, got {}",
                eps
            )));
        }
        Ok(())
    }
}

/// Everything a training run produces
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub model: TrainedModel,
    /// Samples excluded from fitting, in split order
    pub held_out: Vec<LabeledSample>,
    pub evaluation: Evaluation,
    /// Number of samples the SVM was fitted on
    pub n_train: usize,
}

/// Fit a classifier on `dataset` and evaluate it on a held-out partition.
///
/// # Errors
///
/// - [`TrainError::EmptyDataset`] for a dataset without samples
/// - [`TrainError::TooFewSamples`] if the split leaves nothing to train on
/// - [`TrainError::SingleClass`] if the training partition lacks a class
pub fn train(dataset: &Dataset, options: &TrainOptions) -> Result<TrainOutcome, TrainError> {
    options.validate()?;
    let n = dataset.len();
    if n == 0 {
        return Err(TrainError::EmptyDataset);
    }
    let split = train_test_split(n, options.test_ratio, options.seed);
    if split.train.is_empty() || split.test.is_empty() {
        return Err(TrainError::TooFewSamples(n));
    }

    let samples = dataset.samples();
    let train_set: Vec<&LabeledSample> = split.train.iter().map(|&i| &samples[i]).collect();
    let held_out: Vec<LabeledSample> = split.test.iter().map(|&i| samples[i].clone()).collect();

    let n_healthy = train_set
        .iter()
        .filter(|s| s.label == Label::Healthy)
        .count();
    if n_healthy == 0 {
        return Err(TrainError::SingleClass(Label::Unhealthy.name()));
    }
    if n_healthy == train_set.len() {
        return Err(TrainError::SingleClass(Label::Healthy.name()));
    }

    let x = feature_matrix(train_set.iter().copied());
    let y: Array1<bool> = train_set.iter().map(|s| s.label.is_positive()).collect();
    let eps = options.kernel_width.resolve(&x);
    debug!(
        n_train = train_set.len(),
        n_test = held_out.len(),
        eps,
        "fitting svm"
    );

    let params = Svm::<_, Pr>::params()
        .pos_neg_weights(options.c_healthy, options.c_unhealthy)
        .gaussian_kernel(eps);
    let svm = params
        .fit(&DatasetBase::from(x).with_targets(y))
        .map_err(|e| TrainError::Fit(e.to_string()))?;

    let model = TrainedModel::new(*dataset.extract_options(), eps, svm);
    let evaluation = evaluate(&model, &held_out)?;
    info!(
        n_train = train_set.len(),
        n_test = held_out.len(),
        support_vectors = model.n_support_vectors(),
        accuracy = evaluation.accuracy(),
        "trained classifier"
    );

    Ok(TrainOutcome {
        model,
        held_out,
        evaluation,
        n_train: train_set.len(),
    })
}

/// Score `model` against labeled samples.
pub fn evaluate(
    model: &TrainedModel,
    samples: &[LabeledSample],
) -> Result<Evaluation, InferenceError> {
    let pairs = samples
        .iter()
        .map(|s| model.predict(&s.features).map(|p| (s.label, p.label)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Evaluation::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafscan_features::FeatureVector;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::path::PathBuf;

    /// 50 vectors per class, the healthy class shifted by 10 in one feature.
    fn separable(seed: u64) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut samples = Vec::new();
        for (label, offset) in [(Label::Healthy, 10.0), (Label::Unhealthy, 0.0)] {
            for i in 0..50 {
                let mut v = [0.0; 5];
                for x in v.iter_mut() {
                    *x = rng.random_range(-0.5..0.5);
                }
                v[0] += offset;
                samples.push(LabeledSample {
                    features: FeatureVector::from(v),
                    label,
                    source: PathBuf::from(format!("{}_{}", label, i)),
                });
            }
        }
        Dataset::from_samples(samples)
    }

    #[test]
    fn test_separable_perfect_accuracy() {
        let outcome = train(&separable(1), &TrainOptions::default()).unwrap();
        assert_eq!(outcome.held_out.len(), 20);
        assert_eq!(outcome.n_train, 80);
        assert_eq!(outcome.evaluation.confusion.total(), 20);
        assert_eq!(outcome.evaluation.accuracy(), 1.0);
    }

    #[test]
    fn test_split_is_reproducible() {
        let dataset = separable(2);
        let a = train(&dataset, &TrainOptions::default()).unwrap();
        let b = train(&dataset, &TrainOptions::default()).unwrap();
        assert_eq!(a.held_out, b.held_out);
    }

    #[test]
    fn test_empty_dataset() {
        let err = train(&Dataset::default(), &TrainOptions::default()).unwrap_err();
        assert!(matches!(err, TrainError::EmptyDataset));
    }

    #[test]
    fn test_single_class() {
        let samples = (0..10)
            .map(|i| LabeledSample {
                features: FeatureVector::from([i as f64, 0.0, 0.0, 0.0, 0.0]),
                label: Label::Healthy,
                source: PathBuf::from(i.to_string()),
            })
            .collect();
        let err = train(&Dataset::from_samples(samples), &TrainOptions::default()).unwrap_err();
        assert!(matches!(err, TrainError::SingleClass("healthy")));
    }

    #[test]
    fn test_options_validation() {
        let bad = TrainOptions {
            test_ratio: 1.0,
            ..TrainOptions::default()
        };
        assert!(matches!(bad.validate(), Err(TrainError::InvalidOptions(_))));
        let bad = TrainOptions {
            kernel_width: KernelWidth::Fixed(0.0),
            ..TrainOptions::default()
        };
        assert!(bad.validate().is_err());
        assert!(TrainOptions::default().validate().is_ok());
    }

    #[test]
    fn test_scale_width() {
        let x = Array2::from_shape_vec((2, 2), vec![0.0, 0.0, 2.0, 2.0]).unwrap();
        // mean 1, var 1, two features
        assert_eq!(KernelWidth::Scale.resolve(&x), 2.0);
        let flat = Array2::from_elem((3, 5), 4.0);
        assert_eq!(KernelWidth::Scale.resolve(&flat), 1.0);
        assert_eq!(KernelWidth::Fixed(30.0).resolve(&flat), 30.0);
    }
}

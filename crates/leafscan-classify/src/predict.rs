//! Single-vector and single-image prediction

use crate::dataset::load_sample;
use crate::error::{ClassifyError, InferenceError};
use crate::label::Label;
use crate::model::TrainedModel;
use leafscan_features::FeatureVector;
use linfa::DatasetBase;
use linfa::prelude::Pr;
use linfa::traits::Predict;
use ndarray::{Array1, Array2, Axis};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Probability the classifier assigns to each class; the pair sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    pub unhealthy: f64,
    pub healthy: f64,
}

impl ClassProbabilities {
    pub fn of(&self, label: Label) -> f64 {
        match label {
            Label::Unhealthy => self.unhealthy,
            Label::Healthy => self.healthy,
        }
    }
}

/// Outcome of classifying one feature vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: Label,
    /// Probability of `label`, in [0.5, 1]
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
}

impl PredictionResult {
    fn from_healthy_probability(p_healthy: f64) -> Self {
        let probabilities = ClassProbabilities {
            unhealthy: 1.0 - p_healthy,
            healthy: p_healthy,
        };
        let label = Label::from_positive(p_healthy >= 0.5);
        Self {
            label,
            confidence: probabilities.of(label),
            probabilities,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.label == Label::Healthy
    }
}

/// Features of an image together with the prediction made from them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub features: FeatureVector,
    pub prediction: PredictionResult,
}

impl TrainedModel {
    /// Classify a raw feature slice.
    ///
    /// # Errors
    ///
    /// [`InferenceError::DimensionMismatch`] if `values` does not have
    /// [`TrainedModel::feature_dim`] entries, [`InferenceError::NonFinite`]
    /// for NaN or infinite entries.
    pub fn predict_values(&self, values: &[f64]) -> Result<PredictionResult, InferenceError> {
        if values.len() != self.feature_dim() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.feature_dim(),
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::NonFinite);
        }
        let array: Array2<f64> = Array1::from(values.to_vec()).insert_axis(Axis(0));
        let dataset = DatasetBase::from(array);
        let predictions: Array1<Pr> = self.svm.predict(&dataset);
        let p = predictions.first().ok_or(InferenceError::EmptyPrediction)?;
        let p_healthy = f64::from(**p).clamp(0.0, 1.0);
        Ok(PredictionResult::from_healthy_probability(p_healthy))
    }

    /// Classify a feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        self.predict_values(features.as_slice())
    }

    /// Load an image, extract it with this model's options and classify it.
    pub fn classify_image<P: AsRef<Path>>(&self, path: P) -> Result<Classification, ClassifyError> {
        let path = path.as_ref();
        let features = load_sample(path, self.extract_options())?;
        let prediction = self.predict(&features)?;
        debug!(
            path = %path.display(),
            label = %prediction.label,
            confidence = prediction.confidence,
            "classified image"
        );
        Ok(Classification {
            features,
            prediction,
        })
    }
}

/// Classify a feature vector with `model`.
pub fn predict(
    model: &TrainedModel,
    features: &FeatureVector,
) -> Result<PredictionResult, InferenceError> {
    model.predict(features)
}

/// Load, extract and classify the image at `path` with `model`.
pub fn classify_image<P: AsRef<Path>>(
    model: &TrainedModel,
    path: P,
) -> Result<Classification, ClassifyError> {
    model.classify_image(path)
}

//! End-to-end training run
//!
//! Builds the dataset, trains, evaluates, and re-classifies the first few
//! held-out images from their files as a sanity check of the full
//! load/extract/predict path.

use crate::dataset::{DatasetBuilder, SkippedItem};
use crate::error::{DatasetError, WorkflowError};
use crate::label::Label;
use crate::metrics::Evaluation;
use crate::model::TrainedModel;
use crate::predict::PredictionResult;
use crate::train::{TrainOptions, train};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// Number of held-out images re-classified for the report
pub const SPOT_CHECKS: usize = 5;

/// A held-out image classified again from its source file
#[derive(Debug, Clone, PartialEq)]
pub struct SpotCheck {
    pub source: PathBuf,
    pub truth: Label,
    /// `None` if the file could no longer be classified
    pub prediction: Option<PredictionResult>,
}

/// Summary of a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub healthy: usize,
    pub unhealthy: usize,
    pub skipped: Vec<SkippedItem>,
    pub n_train: usize,
    pub n_test: usize,
    pub evaluation: Evaluation,
    pub spot_checks: Vec<SpotCheck>,
}

impl TrainingReport {
    /// Images turned into samples.
    pub fn total(&self) -> usize {
        self.healthy + self.unhealthy
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total images processed: {}", self.total())?;
        writeln!(f, "Healthy samples: {}", self.healthy)?;
        writeln!(f, "Unhealthy samples: {}", self.unhealthy)?;
        if !self.skipped.is_empty() {
            writeln!(f, "Skipped files: {}", self.skipped.len())?;
            for item in &self.skipped {
                writeln!(f, "  {}: {}", item.source.display(), item.reason)?;
            }
        }
        writeln!(
            f,
            "Training samples: {}, test samples: {}",
            self.n_train, self.n_test
        )?;
        writeln!(f)?;
        writeln!(f, "Classification report:")?;
        writeln!(f, "{}", self.evaluation.report)?;
        writeln!(f)?;
        writeln!(f, "Confusion matrix:")?;
        writeln!(f, "{}", self.evaluation.confusion)?;
        if !self.spot_checks.is_empty() {
            writeln!(f)?;
            writeln!(f, "Sample predictions:")?;
            for check in &self.spot_checks {
                let name = check
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default();
                match &check.prediction {
                    Some(p) => writeln!(
                        f,
                        "  {}: true={} predicted={} confidence={:.2}",
                        name, check.truth, p.label, p.confidence
                    )?,
                    None => writeln!(f, "  {}: true={} predicted=<error>", name, check.truth)?,
                }
            }
        }
        Ok(())
    }
}

/// Build a dataset from the builder's directories and train on it.
///
/// # Errors
///
/// [`DatasetError::Empty`] if no image could be used, otherwise any
/// dataset or training error.
pub fn run_training(
    builder: &DatasetBuilder,
    options: &TrainOptions,
) -> Result<(TrainedModel, TrainingReport), WorkflowError> {
    let dataset = builder.build()?;
    if dataset.is_empty() {
        return Err(DatasetError::Empty.into());
    }
    let outcome = train(&dataset, options)?;

    let spot_checks = outcome
        .held_out
        .iter()
        .take(SPOT_CHECKS)
        .map(|sample| {
            let prediction = match outcome.model.classify_image(&sample.source) {
                Ok(c) => Some(c.prediction),
                Err(err) => {
                    warn!(path = %sample.source.display(), error = %err, "spot check failed");
                    None
                }
            };
            SpotCheck {
                source: sample.source.clone(),
                truth: sample.label,
                prediction,
            }
        })
        .collect();

    let report = TrainingReport {
        healthy: dataset.count(Label::Healthy),
        unhealthy: dataset.count(Label::Unhealthy),
        skipped: dataset.skipped().to_vec(),
        n_train: outcome.n_train,
        n_test: outcome.held_out.len(),
        evaluation: outcome.evaluation,
        spot_checks,
    };
    Ok((outcome.model, report))
}

//! leafscan-classify - Leaf health classification
//!
//! Turns two directories of leaf photographs into a trained probabilistic
//! SVM and applies it to new images.
//!
//! # Overview
//!
//! - [`DatasetBuilder`]: extract and label every image of a healthy and an
//!   unhealthy collection
//! - [`train`]: seeded 80/20 split, Gaussian-kernel SVM, held-out
//!   [`Evaluation`]
//! - [`TrainedModel`]: prediction, single-image classification and
//!   persistence
//! - [`ModelRegistry`] and [`ModelContext`]: named models and the one
//!   currently in use
//!
//! ```no_run
//! use leafscan_classify::{DatasetBuilder, TrainOptions, run_training};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let builder = DatasetBuilder::new("data/healthy", "data/unhealthy");
//! let (model, report) = run_training(&builder, &TrainOptions::default())?;
//! println!("{}", report);
//! model.save("leaf.lsm")?;
//!
//! let result = model.classify_image("leaf.jpg")?;
//! println!("{} ({:.1}%)", result.prediction.label, result.prediction.confidence * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod dataset;
mod error;
pub mod label;
pub mod metrics;
pub mod model;
pub mod predict;
pub mod registry;
pub mod split;
pub mod train;
pub mod workflow;

pub use context::{ActiveModel, ModelContext};
pub use dataset::{Dataset, DatasetBuilder, IMAGE_EXTENSIONS, LabeledSample, SkippedItem};
pub use error::{
    ClassifyError, ContextError, DatasetError, InferenceError, ModelLoadError, ModelSaveError,
    RegistryError, SampleError, TrainError, WorkflowError,
};
pub use label::Label;
pub use metrics::{ClassScores, ClassificationReport, ConfusionMatrix, Evaluation};
pub use model::TrainedModel;
pub use predict::{ClassProbabilities, Classification, PredictionResult, classify_image, predict};
pub use registry::ModelRegistry;
pub use train::{KernelWidth, TrainOptions, TrainOutcome, evaluate, train};
pub use workflow::{SpotCheck, TrainingReport, run_training};

//! Error types for leafscan-classify
//!
//! Each fallible stage of the train/infer workflow has its own error type
//! so callers can tell a bad image from a bad model from a bad config.

use leafscan_features::FeatureExtractionError;
use leafscan_io::DecodeError;
use std::path::PathBuf;
use thiserror::Error;

/// A single image could not be turned into a sample
#[derive(Debug, Error)]
pub enum SampleError {
    /// The image could not be read or decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The decoded image could not be reduced to features
    #[error(transparent)]
    Extract(#[from] FeatureExtractionError),
}

/// Dataset construction failed as a whole
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A collection directory does not exist or is not a directory
    #[error("image directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// A collection directory could not be listed
    #[error("failed to list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No image produced a sample
    #[error("no images found")]
    Empty,
}

/// Fitting the classifier failed
#[derive(Debug, Error)]
pub enum TrainError {
    /// The dataset has no samples
    #[error("cannot train on an empty dataset")]
    EmptyDataset,

    /// The split leaves one partition empty
    #[error("{0} samples are too few to hold out a test partition")]
    TooFewSamples(usize),

    /// The training partition holds only one class
    #[error("training partition contains only {0} samples")]
    SingleClass(&'static str),

    /// Training options are unusable
    #[error("invalid training options: {0}")]
    InvalidOptions(String),

    /// The SVM solver failed
    #[error("svm fit failed: {0}")]
    Fit(String),

    /// Evaluating the held-out partition failed
    #[error("evaluation failed: {0}")]
    Evaluate(#[from] InferenceError),
}

/// A prediction could not be made
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Vector length differs from the model's feature dimension
    #[error("feature dimension mismatch: model expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The vector holds NaN or infinite values
    #[error("feature vector contains non-finite values")]
    NonFinite,

    /// The classifier returned no output
    #[error("classifier returned no prediction")]
    EmptyPrediction,
}

/// A persisted model could not be loaded
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// The model file could not be read
    #[error("failed to read model {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a model envelope
    #[error("failed to decode model: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// The envelope belongs to another program
    #[error("not a leafscan model (format tag {0:?})")]
    WrongFormat(String),

    /// The envelope was written by an incompatible version
    #[error("unsupported model version {0}")]
    UnsupportedVersion(u32),

    /// The model was trained on vectors of another length
    #[error("model feature dimension {actual} does not match {expected}")]
    FeatureDimension { expected: usize, actual: usize },
}

/// A model could not be persisted
#[derive(Debug, Error)]
pub enum ModelSaveError {
    /// Serialization failed
    #[error("failed to encode model: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// The destination could not be written
    #[error("failed to write model {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The model registry is unusable
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file could not be read
    #[error("failed to read registry {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry is not valid TOML for this schema
    #[error("failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),

    /// No models are configured
    #[error("registry lists no models")]
    Empty,

    /// The default names a model that is not configured
    #[error("default model {0:?} is not configured")]
    UnknownDefault(String),

    /// A configured model file does not exist
    #[error("model {name:?} points to missing file {}", path.display())]
    MissingModelFile { name: String, path: PathBuf },

    /// A lookup asked for a model that is not configured
    #[error("unknown model {0:?}")]
    UnknownModel(String),
}

/// Loading, extracting and predicting a single image failed
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Operations on the active-model context failed
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Load(#[from] ModelLoadError),

    /// No model has been selected yet
    #[error("no model is active")]
    NoActiveModel,

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// The end-to-end training workflow failed
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Train(#[from] TrainError),
}

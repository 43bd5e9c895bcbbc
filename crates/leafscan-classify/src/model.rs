//! Trained classifier and its on-disk form
//!
//! A model file is a MessagePack envelope:
//!
//! | field         | meaning                                   |
//! |---------------|-------------------------------------------|
//! | `format`      | always `"leafscan-model"`                 |
//! | `version`     | envelope layout, currently 1              |
//! | `feature_dim` | length of the vectors the model expects   |
//! | `model`       | [`TrainedModel`] (extraction options, SVM)|
//!
//! Anything else is rejected with a [`ModelLoadError`].

use crate::error::{ModelLoadError, ModelSaveError};
use leafscan_features::{ExtractOptions, FEATURE_DIM};
use linfa::prelude::Pr;
use linfa_svm::Svm;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const FORMAT_TAG: &str = "leafscan-model";
const FORMAT_VERSION: u32 = 1;

/// A fitted probabilistic SVM plus the parameters its inputs were made with
///
/// Immutable once trained; share it behind an `Arc` for concurrent use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub(crate) extract: ExtractOptions,
    pub(crate) kernel_eps: f64,
    pub(crate) svm: Svm<f64, Pr>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: &'a str,
    version: u32,
    feature_dim: usize,
    model: &'a TrainedModel,
}

#[derive(Deserialize)]
struct Envelope {
    format: String,
    version: u32,
    feature_dim: usize,
    model: TrainedModel,
}

impl TrainedModel {
    pub(crate) fn new(extract: ExtractOptions, kernel_eps: f64, svm: Svm<f64, Pr>) -> Self {
        Self {
            extract,
            kernel_eps,
            svm,
        }
    }

    /// Length of the vectors this model accepts.
    pub fn feature_dim(&self) -> usize {
        FEATURE_DIM
    }

    /// Extraction parameters used for the training images.
    pub fn extract_options(&self) -> &ExtractOptions {
        &self.extract
    }

    /// Gaussian kernel width `eps` in `exp(-|x - y|^2 / eps)`.
    pub fn kernel_eps(&self) -> f64 {
        self.kernel_eps
    }

    /// Number of support vectors kept by the solver.
    pub fn n_support_vectors(&self) -> usize {
        self.svm.nsupport()
    }

    /// Serialize into a self-describing byte blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelSaveError> {
        let envelope = EnvelopeRef {
            format: FORMAT_TAG,
            version: FORMAT_VERSION,
            feature_dim: self.feature_dim(),
            model: self,
        };
        Ok(rmp_serde::to_vec_named(&envelope)?)
    }

    /// Restore a model from [`TrainedModel::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelLoadError> {
        let envelope: Envelope = rmp_serde::from_slice(bytes)?;
        if envelope.format != FORMAT_TAG {
            return Err(ModelLoadError::WrongFormat(envelope.format));
        }
        if envelope.version != FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedVersion(envelope.version));
        }
        if envelope.feature_dim != FEATURE_DIM {
            return Err(ModelLoadError::FeatureDimension {
                expected: FEATURE_DIM,
                actual: envelope.feature_dim,
            });
        }
        Ok(envelope.model)
    }

    /// Write the model to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelSaveError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes).map_err(|source| ModelSaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved model");
        Ok(())
    }

    /// Read a model from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_bytes(&bytes)?;
        debug!(path = %path.display(), "loaded model");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Foreign<'a> {
        format: &'a str,
        version: u32,
        feature_dim: usize,
        model: u8,
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            TrainedModel::from_bytes(b"definitely not msgpack"),
            Err(ModelLoadError::Decode(_))
        ));
        assert!(matches!(
            TrainedModel::from_bytes(&[]),
            Err(ModelLoadError::Decode(_))
        ));
    }

    #[test]
    fn test_foreign_envelope_rejected() {
        let bytes = rmp_serde::to_vec_named(&Foreign {
            format: "other",
            version: 1,
            feature_dim: 5,
            model: 0,
        })
        .unwrap();
        assert!(TrainedModel::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrainedModel::load(dir.path().join("absent.model")).unwrap_err();
        assert!(matches!(err, ModelLoadError::Io { .. }));
    }
}

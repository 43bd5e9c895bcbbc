//! The active model
//!
//! [`ModelContext`] owns the registry and the currently selected model.
//! Selection loads the new model completely before publishing it, so
//! readers see either the previous model or the new one, never a mix.
//! A failed selection leaves the previous model active.

use crate::error::ContextError;
use crate::model::TrainedModel;
use crate::predict::{Classification, PredictionResult};
use crate::registry::ModelRegistry;
use leafscan_features::FeatureVector;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// A loaded model and the registry name it was selected by
#[derive(Debug)]
pub struct ActiveModel {
    pub name: String,
    pub model: TrainedModel,
}

/// Registry plus an atomically replaceable active model
#[derive(Debug)]
pub struct ModelContext {
    registry: ModelRegistry,
    active: RwLock<Option<Arc<ActiveModel>>>,
}

impl ModelContext {
    /// A context with no model selected yet.
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            active: RwLock::new(None),
        }
    }

    /// A context with the registry's default model already loaded.
    ///
    /// Fails if the default model cannot be loaded.
    pub fn with_default(registry: ModelRegistry) -> Result<Self, ContextError> {
        let context = Self::new(registry);
        if let Some(name) = context.registry.default_name().map(str::to_string) {
            context.select(&name)?;
        }
        Ok(context)
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Names a caller may pass to [`ModelContext::select`].
    pub fn available_models(&self) -> Vec<&str> {
        self.registry.names().collect()
    }

    /// Load the model registered as `name` and make it active.
    pub fn select(&self, name: &str) -> Result<Arc<ActiveModel>, ContextError> {
        let path = self.registry.path(name)?;
        let model = TrainedModel::load(&path)?;
        let active = self.install(name, model);
        info!(model = name, path = %path.display(), "model selected");
        Ok(active)
    }

    /// Make an in-memory model active under `name`.
    pub fn install(&self, name: &str, model: TrainedModel) -> Arc<ActiveModel> {
        let active = Arc::new(ActiveModel {
            name: name.to_string(),
            model,
        });
        *self.active.write() = Some(Arc::clone(&active));
        active
    }

    /// Snapshot of the active model.
    pub fn active(&self) -> Option<Arc<ActiveModel>> {
        self.active.read().clone()
    }

    pub fn active_name(&self) -> Option<String> {
        self.active().map(|a| a.name.clone())
    }

    fn require_active(&self) -> Result<Arc<ActiveModel>, ContextError> {
        self.active().ok_or(ContextError::NoActiveModel)
    }

    /// Classify a feature vector with the active model.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, ContextError> {
        Ok(self.require_active()?.model.predict(features)?)
    }

    /// Load, extract and classify an image with the active model.
    pub fn classify_image<P: AsRef<Path>>(&self, path: P) -> Result<Classification, ContextError> {
        Ok(self.require_active()?.model.classify_image(path)?)
    }
}

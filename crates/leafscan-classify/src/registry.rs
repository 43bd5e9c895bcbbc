//! Named model registry
//!
//! A registry file maps model names to persisted model files:
//!
//! ```toml
//! default = "tomato"
//!
//! [models]
//! tomato = "models/tomato.lsm"
//! potato = "models/potato.lsm"
//! ```
//!
//! Relative paths are resolved against the directory holding the
//! registry file.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Model name to model file mapping, validated on load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRegistry {
    /// Model selected when none is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<String>,
    #[serde(default)]
    models: BTreeMap<String, PathBuf>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ModelRegistry {
    /// A registry holding exactly one model, which is also the default.
    pub fn single(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let mut models = BTreeMap::new();
        models.insert(name.clone(), path.into());
        Self {
            default: Some(name),
            models,
            base_dir: None,
        }
    }

    /// Parse registry TOML and check its structure.
    ///
    /// Paths are kept as written; file existence is checked by
    /// [`ModelRegistry::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        let registry: Self = toml::from_str(text)?;
        registry.check_structure()?;
        Ok(registry)
    }

    /// Read, parse and fully validate a registry file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut registry = Self::from_toml_str(&text)?;
        registry.base_dir = path.parent().map(Path::to_path_buf);
        registry.validate()?;
        Ok(registry)
    }

    fn check_structure(&self) -> Result<(), RegistryError> {
        if self.models.is_empty() {
            return Err(RegistryError::Empty);
        }
        if let Some(default) = &self.default
            && !self.models.contains_key(default)
        {
            return Err(RegistryError::UnknownDefault(default.clone()));
        }
        Ok(())
    }

    /// Check structure and that every model file exists.
    pub fn validate(&self) -> Result<(), RegistryError> {
        self.check_structure()?;
        for name in self.models.keys() {
            let path = self.path(name)?;
            if !path.is_file() {
                return Err(RegistryError::MissingModelFile {
                    name: name.clone(),
                    path,
                });
            }
        }
        Ok(())
    }

    /// Configured model names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// The configured default, or the first name when none is set.
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref().or_else(|| self.names().next())
    }

    /// Resolved file path of `name`.
    pub fn path(&self, name: &str) -> Result<PathBuf, RegistryError> {
        let path = self
            .models
            .get(name)
            .ok_or_else(|| RegistryError::UnknownModel(name.to_string()))?;
        Ok(match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let registry = ModelRegistry::from_toml_str(
            r#"
            default = "potato"

            [models]
            tomato = "t.lsm"
            potato = "/abs/p.lsm"
            "#,
        )
        .unwrap();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["potato", "tomato"]
        );
        assert_eq!(registry.default_name(), Some("potato"));
        assert_eq!(registry.path("tomato").unwrap(), PathBuf::from("t.lsm"));
        assert!(matches!(
            registry.path("corn"),
            Err(RegistryError::UnknownModel(n)) if n == "corn"
        ));
    }

    #[test]
    fn test_default_falls_back_to_first() {
        let registry = ModelRegistry::from_toml_str("[models]\nb = \"b\"\na = \"a\"\n").unwrap();
        assert_eq!(registry.default_name(), Some("a"));
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            ModelRegistry::from_toml_str("default = \"x\"\n"),
            Err(RegistryError::Empty)
        ));
        assert!(matches!(
            ModelRegistry::from_toml_str("default = \"x\"\n[models]\ny = \"y\"\n"),
            Err(RegistryError::UnknownDefault(_))
        ));
        assert!(matches!(
            ModelRegistry::from_toml_str("models = 3"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_load_resolves_and_checks_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.lsm"), b"x").unwrap();
        let reg_path = dir.path().join("models.toml");

        std::fs::write(&reg_path, "[models]\na = \"a.lsm\"\n").unwrap();
        let registry = ModelRegistry::load(&reg_path).unwrap();
        assert_eq!(registry.path("a").unwrap(), dir.path().join("a.lsm"));

        std::fs::write(&reg_path, "[models]\na = \"a.lsm\"\nb = \"b.lsm\"\n").unwrap();
        let err = ModelRegistry::load(&reg_path).unwrap_err();
        match err {
            RegistryError::MissingModelFile { name, .. } => assert_eq!(name, "b"),
            other => panic!("unexpected error: {}", other),
        }

        let err = ModelRegistry::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }
}

//! Engine configuration: which categories the host knows and which
//! namespace owns the fallback variant and the settings document.

use serde::{Deserialize, Serialize};
use std::path::Path;
use varietal_core::{IdentifierError, VariantRegistry, VariantSnapshot, VariantStore};

use crate::loader::{DataLoadError, deserialize_file};

pub const DEFAULT_NAMESPACE: &str = "varietal";

/// Categories every stock host spawns.
pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "cat", "chicken", "cow", "pig", "sheep", "spider", "wolf", "zombie", "skeleton",
];

/// Top-level engine configuration, typically loaded from `varietal.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Namespace of the fallback variant and the settings document.
    pub fallback_namespace: String,
    /// Categories that always receive a fallback when left empty.
    pub categories: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_namespace: DEFAULT_NAMESPACE.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML, RON or JSON file. Absent keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        deserialize_file(path)
    }

    /// An empty registry for the configured categories.
    pub fn registry(&self) -> Result<VariantRegistry, IdentifierError> {
        VariantRegistry::new(&self.fallback_namespace, self.categories.iter().cloned())
    }

    /// A store holding the process-start snapshot.
    pub fn store(&self) -> Result<VariantStore, IdentifierError> {
        Ok(VariantStore::new(VariantSnapshot::empty(self.registry()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "varietal_config_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_declares_stock_categories() {
        let config = EngineConfig::default();
        let reg = config.registry().unwrap();
        assert_eq!(reg.declared_categories().len(), DEFAULT_CATEGORIES.len());
        assert_eq!(reg.fallback().identifier().to_string(), "varietal:default");
    }

    #[test]
    fn load_toml_with_partial_keys() {
        let dir = make_test_dir("toml");
        let path = dir.join("varietal.toml");
        fs::write(&path, r#"categories = ["cow", "axolotl"]"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.fallback_namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.categories, vec!["cow", "axolotl"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_ron() {
        let dir = make_test_dir("ron");
        let path = dir.join("varietal.ron");
        fs::write(&path, r#"(fallback_namespace: "mypack")"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.fallback_namespace, "mypack");
        assert_eq!(config.categories.len(), DEFAULT_CATEGORIES.len());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_namespace_fails_store_creation() {
        let config = EngineConfig {
            fallback_namespace: "bad:ns".to_string(),
            ..Default::default()
        };
        assert!(config.store().is_err());
    }
}

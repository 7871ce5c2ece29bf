//! Feature Schema - Ordered input contract of the loaded classifier

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::SENTINEL_COLUMN;
use super::layout::{compute_layout_hash, FEATURE_LAYOUT, FEATURE_VERSION};

/// Immutable ordered list of feature column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Schema equal to the built-in layout
    pub fn builtin() -> Self {
        Self::new(FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect())
    }

    /// Build from a raw feature list, dropping the training target column
    pub fn from_feature_list(names: Vec<String>) -> Self {
        let before = names.len();
        let names: Vec<String> = names.into_iter().filter(|n| n != SENTINEL_COLUMN).collect();

        if names.len() != before {
            log::debug!("Dropped sentinel column '{}' from feature list", SENTINEL_COLUMN);
        }

        Self::new(names)
    }

    /// Parse a JSON array of names
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let names: Vec<String> = serde_json::from_slice(bytes)?;
        Ok(Self::from_feature_list(names))
    }

    /// Load a JSON array of names from disk
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Layout hash of this schema
    pub fn hash(&self) -> u32 {
        compute_layout_hash(FEATURE_VERSION, &self.names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::layout_hash;

    #[test]
    fn test_sentinel_filtered() {
        let schema = FeatureSchema::from_json(br#"["sport", "Label", "dur"]"#).unwrap();
        assert_eq!(schema.names(), &["sport", "dur"]);
        assert!(!schema.contains("Label"));
    }

    #[test]
    fn test_builtin_hash_matches_layout() {
        assert_eq!(FeatureSchema::builtin().hash(), layout_hash());
        assert_eq!(FeatureSchema::builtin().len(), 49);
    }

    #[test]
    fn test_invalid_json() {
        assert!(FeatureSchema::from_json(b"{\"sport\": 1}").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_features.json");
        std::fs::write(&path, r#"["Label", "sport"]"#).unwrap();

        let schema = FeatureSchema::load(&path).unwrap();
        assert_eq!(schema.names(), &["sport"]);
    }
}

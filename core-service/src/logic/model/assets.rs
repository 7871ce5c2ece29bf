//! Asset Loader - Classifier, label map and feature schema
//!
//! Load một lần lúc khởi động, bất biến sau đó.
//! Lỗi ở đây là fatal: không có đủ 3 artifacts thì không phục vụ session nào.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::constants;
use crate::logic::features::{validate_schema, FeatureSchema, SchemaMismatchError};
use super::inference::{Classifier, EngineStats, EngineStatus, InferenceError};
use super::labels::LabelMap;
use super::onnx::OnnxClassifier;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to load classifier: {0}")]
    Model(#[from] InferenceError),

    #[error(transparent)]
    Schema(#[from] SchemaMismatchError),

    #[error("Label map is empty")]
    EmptyLabelMap,

    #[error("Classifier rejected a {features}-feature zero row: {reason}")]
    ModelContract { features: usize, reason: String },
}

// ============================================================================
// PATHS & METADATA
// ============================================================================

/// Locations of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPaths {
    pub model: PathBuf,
    pub label_map: PathBuf,
    pub features: PathBuf,
}

impl AssetPaths {
    /// Read MODEL_PATH / LABEL_MAP_PATH / MODEL_FEATURES_PATH with defaults
    pub fn from_env() -> Self {
        Self {
            model: constants::get_model_path().into(),
            label_map: constants::get_label_map_path().into(),
            features: constants::get_model_features_path().into(),
        }
    }

    /// Default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join(constants::DEFAULT_MODEL_PATH),
            label_map: dir.join(constants::DEFAULT_LABEL_MAP_PATH),
            features: dir.join(constants::DEFAULT_MODEL_FEATURES_PATH),
        }
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub model_path: Option<String>,
    /// SHA-256 of the model file, hex
    pub checksum: Option<String>,
    pub feature_count: usize,
    pub schema_hash: u32,
    pub label_count: usize,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// ASSETS
// ============================================================================

/// Process-wide, read-only bundle passed into every pipeline call
pub struct Assets {
    classifier: Box<dyn Classifier>,
    label_map: LabelMap,
    schema: FeatureSchema,
    metadata: ModelMetadata,
    stats: EngineStats,
}

impl std::fmt::Debug for Assets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assets")
            .field("classifier", &self.classifier.name())
            .field("labels", &self.label_map.len())
            .field("features", &self.schema.len())
            .finish()
    }
}

impl Assets {
    /// Load all three artifacts from disk and check they agree
    pub fn load(paths: &AssetPaths) -> Result<Self, AssetError> {
        log::info!(
            "Loading assets (model: {}, labels: {}, features: {})",
            paths.model.display(),
            paths.label_map.display(),
            paths.features.display()
        );

        let schema = load_schema(&paths.features)?;
        validate_schema(&schema)?;

        let label_map = load_label_map(&paths.label_map)?;

        let model_bytes = read(&paths.model)?;
        let checksum = hex::encode(Sha256::digest(&model_bytes));
        let model_name = paths
            .model
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        let classifier = OnnxClassifier::from_bytes(&model_name, &model_bytes)?;

        check_model_width(&classifier, schema.len())?;

        let mut assets = Self::from_parts(Box::new(classifier), label_map, schema)?;
        assets.metadata.model_path = Some(paths.model.display().to_string());
        assets.metadata.checksum = Some(checksum);

        log::info!(
            "Assets ready: {} features, {} labels, model sha256 {}",
            assets.schema.len(),
            assets.label_map.len(),
            assets.metadata.checksum.as_deref().unwrap_or("-")
        );

        Ok(assets)
    }

    /// Assemble from already-loaded parts; the schema must match the built-in layout
    pub fn from_parts(
        classifier: Box<dyn Classifier>,
        label_map: LabelMap,
        schema: FeatureSchema,
    ) -> Result<Self, AssetError> {
        validate_schema(&schema)?;

        if label_map.is_empty() {
            return Err(AssetError::EmptyLabelMap);
        }

        let metadata = ModelMetadata {
            model_name: classifier.name().to_string(),
            model_path: None,
            checksum: None,
            feature_count: schema.len(),
            schema_hash: schema.hash(),
            label_count: label_map.len(),
            loaded_at: Utc::now(),
        };

        Ok(Self {
            classifier,
            label_map,
            schema,
            metadata,
            stats: EngineStats::default(),
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn label_map(&self) -> &LabelMap {
        &self.label_map
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn status(&self) -> EngineStatus {
        self.stats.status(self.classifier.name())
    }

    pub(crate) fn record_run(&self, started: Instant, rows: usize) -> u64 {
        self.stats.record(started, rows)
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Feature list artifact, `Label` sentinel dropped
pub(crate) fn load_schema(path: &Path) -> Result<FeatureSchema, AssetError> {
    FeatureSchema::from_json(&read(path)?).map_err(|source| AssetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn load_label_map(path: &Path) -> Result<LabelMap, AssetError> {
    LabelMap::from_json(&read(path)?).map_err(|source| AssetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Run one all-zero row to make sure the model accepts the schema width
fn check_model_width(classifier: &dyn Classifier, features: usize) -> Result<(), AssetError> {
    let zeros = Array2::<f32>::zeros((1, features));

    match classifier.predict(&zeros) {
        Ok(ids) if ids.len() == 1 => Ok(()),
        Ok(ids) => Err(AssetError::ModelContract {
            features,
            reason: format!("expected 1 prediction, got {}", ids.len()),
        }),
        Err(e) => Err(AssetError::ModelContract {
            features,
            reason: e.to_string(),
        }),
    }
}

//! Central Configuration Constants
//!
//! Single source of truth for artifact names, column names and display defaults.
//! To change a default artifact location, only edit this file.

/// Default trained classifier artifact (ONNX)
pub const DEFAULT_MODEL_PATH: &str = "model.onnx";

/// Default class id -> attack name mapping (JSON object)
pub const DEFAULT_LABEL_MAP_PATH: &str = "label_map.json";

/// Default ordered feature name list (JSON array)
pub const DEFAULT_MODEL_FEATURES_PATH: &str = "model_features.json";

/// Sentinel column that the feature list artifact carries from training.
/// It is the target column, never a model input.
pub const SENTINEL_COLUMN: &str = "Label";

/// Column appended to every annotated table
pub const ATTACK_TYPE_COLUMN: &str = "Attack Type";

/// Display name for class ids missing from the label map
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Value used for schema columns absent from an upload
pub const ZERO_FILL: &str = "0";

/// Label of benign traffic; every other label counts as an attack
pub const BENIGN_LABEL: &str = "Normal";

/// Pass-through columns shown next to the prediction (order matters)
pub const DISPLAY_COLUMNS: &[&str] = &["srcip", "dstip", "proto"];

/// Default number of rows shown after an upload
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Default number of rows shown after a prediction run
pub const DEFAULT_DISPLAY_ROWS: usize = 20;

/// Default export file name
pub const EXPORT_FILE_NAME: &str = "predictions.csv";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get label map path from environment or use default
pub fn get_label_map_path() -> String {
    std::env::var("LABEL_MAP_PATH")
        .unwrap_or_else(|_| DEFAULT_LABEL_MAP_PATH.to_string())
}

/// Get feature list path from environment or use default
pub fn get_model_features_path() -> String {
    std::env::var("MODEL_FEATURES_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_FEATURES_PATH.to_string())
}

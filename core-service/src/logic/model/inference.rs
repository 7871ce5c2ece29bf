//! Inference Runner - Classifier contract & batch prediction
//!
//! Chạy classifier một lần cho cả bảng (batch), giữ nguyên thứ tự dòng.
//! Class id không có trong label map → "Unknown", không làm hỏng cả batch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::AlignedTable;
use super::labels::LabelMap;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Non-numeric value '{value}' in feature '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Classifier returned {found} predictions for {expected} rows")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("Feature matrix error: {0}")]
    Shape(String),

    #[error("Model error: {0}")]
    Model(String),
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Dense `[rows, features]` input, columns in feature schema order
pub type FeatureMatrix = Array2<f32>;

/// Trait cho classifiers (ONNX, test stubs, ...)
///
/// `predict` must return exactly one class id per input row, in row order.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>, InferenceError>;
}

// ============================================================================
// FEATURE CONVERSION
// ============================================================================

/// Parse one feature cell. Empty → NaN, true/false → 1/0.
pub fn parse_feature(value: &str) -> Option<f32> {
    let value = value.trim();

    if value.is_empty() {
        return Some(f32::NAN);
    }
    if value.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }

    value.parse::<f32>().ok()
}

/// Convert an aligned table into a dense `[rows, features]` matrix
pub fn to_feature_matrix(aligned: &AlignedTable<'_>) -> Result<FeatureMatrix, InferenceError> {
    let rows = aligned.row_count();
    let cols = aligned.column_count();
    let mut data = Vec::with_capacity(rows * cols);

    for (row, cells) in aligned.rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let value = parse_feature(cell).ok_or_else(|| InferenceError::NonNumeric {
                column: aligned.columns()[col].clone(),
                row,
                value: cell.to_string(),
            })?;
            data.push(value);
        }
    }

    Array2::from_shape_vec((rows, cols), data)
        .map_err(|e| InferenceError::Shape(e.to_string()))
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Run the classifier once over the whole aligned table
pub fn predict_ids(
    aligned: &AlignedTable<'_>,
    classifier: &dyn Classifier,
) -> Result<Vec<i64>, InferenceError> {
    let expected = aligned.row_count();
    if expected == 0 {
        return Ok(Vec::new());
    }

    let features = to_feature_matrix(aligned)?;
    let ids = classifier.predict(&features)?;

    if ids.len() != expected {
        return Err(InferenceError::RowCountMismatch {
            expected,
            found: ids.len(),
        });
    }

    Ok(ids)
}

/// Map class ids to display names, "Unknown" for unmapped ids
pub fn resolve_labels(ids: &[i64], label_map: &LabelMap) -> Vec<String> {
    ids.iter().map(|&id| label_map.resolve(id).to_string()).collect()
}

/// Predict and resolve: one display label per aligned row
pub fn infer(
    aligned: &AlignedTable<'_>,
    classifier: &dyn Classifier,
    label_map: &LabelMap,
) -> Result<Vec<String>, InferenceError> {
    let ids = predict_ids(aligned, classifier)?;

    let unmapped = ids.iter().filter(|&&id| label_map.get(id).is_none()).count();
    if unmapped > 0 {
        log::warn!("{} of {} predictions have no label mapping", unmapped, ids.len());
    }

    Ok(resolve_labels(&ids, label_map))
}

// ============================================================================
// ENGINE STATS
// ============================================================================

/// Latency / volume counters for one loaded classifier
#[derive(Debug, Default)]
pub struct EngineStats {
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
    rows_classified: AtomicU64,
}

/// Engine Status for UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
    pub rows_classified: u64,
}

impl EngineStats {
    pub fn record(&self, started: Instant, rows: usize) -> u64 {
        let elapsed = started.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(elapsed, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);
        self.rows_classified.fetch_add(rows as u64, Ordering::Relaxed);
        elapsed
    }

    pub fn status(&self, model_name: &str) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: true,
            model_name: model_name.to_string(),
            avg_latency_ms: avg,
            inference_count: count,
            rows_classified: self.rows_classified.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

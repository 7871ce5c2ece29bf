//! ONNX Classifier - ONNX Runtime Integration
//!
//! Load model ONNX (sklearn-onnx / xgboost export) và trả về class id cho từng dòng.

use std::path::Path;

use ndarray::{Array2, ArrayView2};
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::Tensor;
use parking_lot::Mutex;

use super::inference::{Classifier, InferenceError};

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    name: String,
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn from_file(path: &Path) -> Result<Self, InferenceError> {
        let bytes = std::fs::read(path)
            .map_err(|e| InferenceError::Model(format!("Failed to read {}: {}", path.display(), e)))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        Self::from_bytes(&name, &bytes)
    }

    /// Load ONNX model from bytes
    pub fn from_bytes(name: &str, model_bytes: &[u8]) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model '{}' ({} bytes)", name, model_bytes.len());

        let session = Session::builder()
            .map_err(|e| InferenceError::Model(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Model(format!("Failed to set optimization: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| InferenceError::Model(format!("Failed to load model: {}", e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| InferenceError::Model("No input defined".to_string()))?;

        // sklearn-onnx exports "output_label" (int64) + "output_probability"
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Model("No output defined".to_string()))?;

        log::info!(
            "ONNX model '{}' loaded (input: {}, output: {})",
            name,
            input_name,
            output_name
        );

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &Array2<f32>) -> Result<Vec<i64>, InferenceError> {
        let (rows, cols) = features.dim();
        let shape = vec![rows as i64, cols as i64];
        let data: Vec<f32> = features.iter().copied().collect();

        let input_tensor = Tensor::from_array((shape, data))
            .map_err(|e| InferenceError::Model(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| InferenceError::Model(format!("Inference failed: {}", e)))?;

        extract_class_ids(&outputs, &self.output_name, rows)
    }
}

/// Read class ids from an int64 label tensor, or argmax a float score tensor
fn extract_class_ids(
    outputs: &SessionOutputs,
    output_name: &str,
    rows: usize,
) -> Result<Vec<i64>, InferenceError> {
    let output = outputs
        .get(output_name)
        .ok_or_else(|| InferenceError::Model(format!("No output '{}'", output_name)))?;

    if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
        return Ok(data.to_vec());
    }

    let (_, data) = output
        .try_extract_tensor::<f32>()
        .map_err(|e| InferenceError::Model(format!("Extract error: {}", e)))?;

    argmax_rows(data, rows)
}

/// Per-row argmax over a flat `[rows, classes]` buffer
fn argmax_rows(data: &[f32], rows: usize) -> Result<Vec<i64>, InferenceError> {
    if rows == 0 || data.len() % rows != 0 {
        return Err(InferenceError::Shape(format!(
            "{} scores cannot be split into {} rows",
            data.len(),
            rows
        )));
    }

    let classes = data.len() / rows;
    let scores = ArrayView2::from_shape((rows, classes), data)
        .map_err(|e| InferenceError::Shape(e.to_string()))?;

    Ok(scores
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0usize, f32::NEG_INFINITY), |best, (i, &v)| {
                    if v > best.1 { (i, v) } else { best }
                })
                .0 as i64
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_rows() {
        let scores = [0.1, 0.7, 0.2, 0.9, 0.05, 0.05];
        assert_eq!(argmax_rows(&scores, 2).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_argmax_single_column() {
        assert_eq!(argmax_rows(&[0.3, 0.8], 2).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_argmax_bad_shape() {
        assert!(argmax_rows(&[0.1, 0.2, 0.3], 2).is_err());
    }

    #[test]
    fn test_missing_model_file() {
        let result = OnnxClassifier::from_file(Path::new("/nonexistent/model.onnx"));
        assert!(matches!(result, Err(InferenceError::Model(_))));
    }
}

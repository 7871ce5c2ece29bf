//! Model Module - Classifier loading & inference
//!
//! Tách logic inference khỏi feature alignment.
//! Dễ dàng swap model qua trait `Classifier`.

pub mod assets;
pub mod inference;
pub mod labels;
pub mod onnx;

// Re-export common types
pub use assets::{AssetError, AssetPaths, Assets, ModelMetadata};
pub use inference::{infer, predict_ids, Classifier, EngineStatus, FeatureMatrix, InferenceError};
pub use labels::LabelMap;
pub use onnx::OnnxClassifier;

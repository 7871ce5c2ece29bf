//! NIDS Core - Feature alignment & inference pipeline
//!
//! Nhận một bảng CSV bất kỳ, chuẩn hoá về 49 features mà classifier yêu cầu,
//! chạy classifier và gắn nhãn "Attack Type" cho từng dòng.
//!
//! ```text
//! Assets::load ──► align(table, schema) ──► infer(aligned, classifier, labels)
//!   (startup)          (zero-fill)              (batch, "Unknown" fallback)
//! ```

pub mod constants;
pub mod logic;

pub use logic::features::{align, AlignedTable, FeatureSchema, LayoutInfo};
pub use logic::model::{AssetError, AssetPaths, Assets, Classifier, InferenceError, LabelMap};
pub use logic::pipeline::{predict_table, AnnotatedTable, PipelineError, PredictionRun};
pub use logic::report::AttackSummary;
pub use logic::table::{Table, TableError, TablePreview};

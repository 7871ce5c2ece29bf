//! Features Module - Feature Schema & Alignment
//!
//! Tách logic chuẩn hoá bảng input khỏi inference.
//! Layout cố định (49 features) là nguồn sự thật duy nhất cho thứ tự cột.

pub mod layout;
pub mod schema;
pub mod align;


// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, LayoutInfo, SchemaMismatchError, validate_schema};
pub use schema::FeatureSchema;
pub use align::{align, align_with_stats, AlignedTable, AlignmentStats};

//! Logic Module - Business Logic & Engines
//!
//! - `table` - CSV parsing / export
//! - `features/` - Feature layout, schema, alignment
//! - `model/` - Asset loading, ONNX classifier, inference
//! - `pipeline` - align → infer → annotate
//! - `report` - Attack type summary

pub mod table;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod report;

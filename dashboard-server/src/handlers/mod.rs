//! HTTP handlers

pub mod health;
pub mod schema;
pub mod sessions;
pub mod predictions;
pub mod visualization;

//! Data models

pub mod session;
pub mod prediction;

pub use session::*;
pub use prediction::*;

//! Session models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nids_core::TablePreview;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub rows: usize,
    pub columns: Vec<String>,
    pub predicted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session: SessionStatus,
    pub preview: TablePreview,
}

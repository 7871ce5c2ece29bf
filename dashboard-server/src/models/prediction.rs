//! Prediction models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nids_core::logic::features::LayoutInfo;
use nids_core::logic::model::{EngineStatus, ModelMetadata};
use nids_core::logic::pipeline::RunReport;
use nids_core::{AttackSummary, TablePreview};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub session_id: Uuid,
    pub run: RunReport,
    /// srcip, dstip, proto & attack type
    pub display: TablePreview,
    pub summary: AttackSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub session_id: Uuid,
    /// Rows not labelled as benign traffic
    pub attack_rows: usize,
    pub summary: AttackSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LabelEntry {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub layout: LayoutInfo,
    pub model: ModelMetadata,
    pub engine: EngineStatus,
    pub labels: Vec<LabelEntry>,
}

//! Feature schema & model handler

use axum::{extract::State, Json};

use nids_core::LayoutInfo;

use crate::AppState;
use crate::models::{LabelEntry, SchemaResponse};

/// Feature layout, loaded model metadata and label names
pub async fn get(State(state): State<AppState>) -> Json<SchemaResponse> {
    let assets = &state.assets;

    Json(SchemaResponse {
        layout: LayoutInfo::current(),
        model: assets.metadata().clone(),
        engine: assets.status(),
        labels: assets
            .label_map()
            .iter()
            .map(|(id, name)| LabelEntry { id, name: name.to_string() })
            .collect(),
    })
}

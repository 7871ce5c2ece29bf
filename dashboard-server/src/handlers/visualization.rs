//! Visualization handlers - attack type proportions

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use nids_core::constants::BENIGN_LABEL;

use crate::{AppState, AppError, AppResult};
use crate::models::SummaryResponse;

/// Pie chart data for a predicted session
pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SummaryResponse>> {
    let session = state.sessions.get(id).ok_or_else(AppError::no_session)?;
    let predictions = session.predictions.ok_or_else(AppError::no_predictions)?;

    let summary = predictions.summary();

    Ok(Json(SummaryResponse {
        session_id: id,
        attack_rows: summary.attack_rows(BENIGN_LABEL),
        summary,
    }))
}

//! Prediction handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use nids_core::constants::EXPORT_FILE_NAME;
use nids_core::predict_table;

use crate::{AppState, AppError, AppResult};
use crate::models::PredictResponse;

/// Run align + inference over the session's upload
pub async fn run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PredictResponse>> {
    let session = state.sessions.get(id).ok_or_else(AppError::no_session)?;

    let assets = state.assets.clone();
    let table = session.table.clone();
    let run = tokio::task::spawn_blocking(move || predict_table(&assets, &table)).await??;

    let response = PredictResponse {
        session_id: id,
        run: run.report(),
        display: run.annotated.display_view(state.config.display_rows),
        summary: run.annotated.summary(),
    };

    if !state.sessions.set_predictions(id, run.annotated) {
        return Err(AppError::no_session());
    }

    tracing::info!("Session {}: {} rows classified", id, response.run.rows);

    Ok(Json(response))
}

/// Download the annotated table as CSV
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.get(id).ok_or_else(AppError::no_session)?;
    let predictions = session.predictions.ok_or_else(AppError::no_predictions)?;

    let csv = predictions
        .to_csv_bytes()
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    ))
}

//! Upload / session handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use nids_core::Table;

use crate::{AppState, AppError, AppResult};
use crate::models::{SessionStatus, UploadResponse};

/// Upload a CSV (multipart field `file`) and open a session for it
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.csv").to_string();
        if !filename.to_ascii_lowercase().ends_with(".csv") {
            return Err(AppError::ValidationError(format!(
                "Only CSV files are supported, got '{}'",
                filename
            )));
        }

        let data = field.bytes().await?;
        let table = Table::from_csv_bytes(&data)?;

        let session = state.sessions.create(filename, table);
        tracing::info!(
            "Session {} created: {} ({} rows, {} columns)",
            session.id,
            session.filename,
            session.table.row_count(),
            session.table.column_count()
        );

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                preview: session.table.preview(state.config.preview_rows),
                session: session.status(),
            }),
        ));
    }

    Err(AppError::ValidationError("Missing multipart field 'file'".to_string()))
}

/// Session status
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionStatus>> {
    let session = state.sessions.get(id).ok_or_else(AppError::no_session)?;
    Ok(Json(session.status()))
}

/// Discard a session and its tables
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(id).ok_or_else(AppError::no_session)?;
    tracing::debug!("Session {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

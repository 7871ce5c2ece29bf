//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model: String,
    active_sessions: usize,
    timestamp: i64,
}

/// Assets are loaded before the router exists, so a response means ready
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model: state.assets.metadata().model_name.clone(),
        active_sessions: state.sessions.len(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

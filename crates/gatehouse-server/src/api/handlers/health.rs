//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
    pub uptime_secs: i64,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.db.health().await {
        Ok(()) => "ok",
        Err(_) => "unreachable",
    };
    let uptime = chrono::Utc::now() - state.started_at;
    Json(HealthResponse {
        status: if database == "ok" { "ok" } else { "degraded" }.into(),
        database: database.into(),
        version: state.version.clone(),
        uptime_secs: uptime.num_seconds(),
    })
}

//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("haat-assist")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    pub oracle: OracleStatus,
    /// Most recent oracle fallback reason, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OracleStatus {
    /// "gemini", "disabled", ...
    pub name: String,
    pub available: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let last_error = state.last_error.read().await.clone();
    let oracle = state.assistant.oracle();

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "haat-assist".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        oracle: OracleStatus {
            name: oracle.name().to_string(),
            available: oracle.is_available(),
        },
        last_error,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

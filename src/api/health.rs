//! Health and readiness endpoints.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadyResponse {
    pub status: String,
    pub timestamp: String,
    pub provider: String,
}

/// GET /api/healthz - Liveness
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// GET /api/ready - Ready once an email provider is configured
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>> {
    if !state.dispatcher.is_provider_configured() {
        return Err(AppError::ServiceUnavailable(
            "ACS endpoint is not configured".to_string(),
        ));
    }

    Ok(Json(ReadyResponse {
        status: "Ready".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        provider: state.dispatcher.provider_name().to_string(),
    }))
}

//! Health check handler

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// False until OIDC discovery has completed
    pub provider_ready: bool,
}

/// GET /health - liveness plus provider readiness
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "swangate-web",
        provider_ready: state.provider_ready(),
    })
}

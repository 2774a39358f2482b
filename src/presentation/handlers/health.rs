use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::presentation::handlers::ApiError;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
}

pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse { status: "ok" })
}

/// Job-store reachability check.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| ApiError::Unavailable(format!("Job store connection failed: {}", e)))?;

    Ok(Json(HealthResponse {
        status: "ok",
        store: "ok",
    }))
}

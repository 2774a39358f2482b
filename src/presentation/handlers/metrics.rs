use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::presentation::handlers::ApiError;
use crate::presentation::state::AppState;

/// Live registry sizes plus the permanent terminal-transition tallies.
/// The totals outlive result-TTL expiry; the sizes do not.
#[derive(Serialize)]
pub struct MetricsResponse {
    pub queue_name: String,
    pub pending: usize,
    pub active: usize,
    pub completed: usize,
    pub failed: usize,
    pub total_completed: u64,
    pub total_failed: u64,
}

pub async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let sizes = state.store.registry_sizes().await?;
    let counters = state.store.counters().await?;

    Ok(Json(MetricsResponse {
        queue_name: state.settings.queue.name.clone(),
        pending: sizes.queued,
        active: sizes.started,
        completed: sizes.finished,
        failed: sizes.failed,
        total_completed: counters.completed,
        total_failed: counters.failed,
    }))
}

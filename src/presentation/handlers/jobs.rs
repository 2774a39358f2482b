use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CaptionOutputs, JobId, JobStatus, ResultEnvelope};
use crate::presentation::handlers::ApiError;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ListJobsQuery {
    #[serde(default = "default_list_status")]
    status: String,
}

fn default_list_status() -> String {
    "queued".to_string()
}

#[derive(Serialize)]
pub struct JobSummary {
    pub id: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobSummary>,
}

/// Client-facing status payload. The flat `status` string collapses
/// queued and started into "queued or in progress"; a finished job is
/// "done" or "error" depending on its envelope.
#[derive(Serialize)]
#[serde(untagged)]
pub enum JobStatusResponse {
    Done {
        status: &'static str,
        outputs: CaptionOutputs,
        filename: String,
        webhook_error: Option<String>,
    },
    Error {
        status: &'static str,
        error: String,
        filename: String,
    },
    Failed {
        status: &'static str,
        error: String,
    },
    InProgress {
        status: &'static str,
    },
}

pub async fn list_jobs_handler(
    State(state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> Result<Json<JobListResponse>, ApiError> {
    let status: JobStatus = query.status.parse().map_err(ApiError::Validation)?;
    let ids = state.store.list_ids(status).await?;

    Ok(Json(JobListResponse {
        jobs: ids
            .into_iter()
            .map(|id| JobSummary {
                id: id.to_string(),
                status: status.to_string(),
            })
            .collect(),
    }))
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>, ApiError> {
    let id = parse_job_id(&job_id)?;
    let job = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", job_id)))?;

    let response = match (&job.status, &job.result) {
        (JobStatus::Finished, Some(ResultEnvelope::Done { filename, outputs, webhook_error })) => {
            JobStatusResponse::Done {
                status: "done",
                outputs: outputs.clone(),
                filename: filename.clone(),
                webhook_error: webhook_error.clone(),
            }
        }
        (JobStatus::Finished, Some(ResultEnvelope::Error { error, filename })) => {
            JobStatusResponse::Error {
                status: "error",
                error: error.clone(),
                filename: filename.clone(),
            }
        }
        (JobStatus::Failed, _) => JobStatusResponse::Failed {
            status: "failed",
            error: job
                .fault
                .clone()
                .unwrap_or_else(|| "unknown worker fault".to_string()),
        },
        _ => JobStatusResponse::InProgress {
            status: "queued or in progress",
        },
    };

    Ok(Json(response))
}

#[tracing::instrument(skip(state))]
pub async fn delete_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_job_id(&job_id)?;
    state.dispatcher.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unparseable ids are treated as unknown jobs, not validation errors.
pub(super) fn parse_job_id(raw: &str) -> Result<JobId, ApiError> {
    Uuid::parse_str(raw)
        .map(JobId::from_uuid)
        .map_err(|_| ApiError::NotFound(format!("Job {} not found", raw)))
}

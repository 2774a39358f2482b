use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::domain::{JobStatus, ResultEnvelope};
use crate::presentation::handlers::jobs::parse_job_id;
use crate::presentation::handlers::ApiError;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default = "default_output")]
    output: String,
}

fn default_output() -> String {
    "vtt".to_string()
}

/// Raw rendered bytes for one output format of a finished job, with a
/// content-disposition filename derived from the stored display name.
#[tracing::instrument(skip(state))]
pub async fn download_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let id = parse_job_id(&job_id)?;
    let job = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not ready or does not exist".to_string()))?;

    let (filename, outputs) = match (&job.status, &job.result) {
        (JobStatus::Finished, Some(ResultEnvelope::Done { filename, outputs, .. })) => {
            (filename, outputs)
        }
        _ => {
            return Err(ApiError::NotFound(
                "Job not ready or does not exist".to_string(),
            ));
        }
    };

    let content = outputs.get(&query.output).ok_or_else(|| {
        ApiError::NotFound(format!(
            "Output format '{}' not found for this job",
            query.output
        ))
    })?;

    let headers = [
        (
            header::CONTENT_TYPE,
            mime_for_output(&query.output).to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.{}\"", filename, query.output),
        ),
    ];

    Ok((headers, content.to_string()).into_response())
}

fn mime_for_output(output: &str) -> &'static str {
    match output {
        "txt" | "text" => "text/plain",
        "json" => "application/json",
        "vtt" | "words" => "text/vtt",
        "srt" => "application/x-subrip",
        _ => "application/octet-stream",
    }
}

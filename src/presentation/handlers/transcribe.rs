use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use futures::StreamExt;
use serde::Serialize;

use crate::domain::{Job, JobData, StoragePath};
use crate::infrastructure::ingest::{guess_extension, url_basename, FetchError};
use crate::presentation::handlers::ApiError;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct EnqueueResponse {
    pub job_id: String,
}

#[derive(Default)]
struct TranscribeForm {
    file: Option<(Option<String>, Bytes)>,
    audio_url: Option<String>,
    filename: Option<String>,
    language: Option<String>,
    model: Option<String>,
    task: Option<String>,
    webhook_url: Option<String>,
}

/// Accepts an upload or a remote URL (exactly one), stages the audio
/// under a collision-free name and submits the job. The response does
/// not wait on transcription.
#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EnqueueResponse>, ApiError> {
    let form = read_form(&mut multipart).await?;

    if form.file.is_some() && form.audio_url.is_some() {
        return Err(ApiError::Validation(
            "Must provide exactly one of 'file' or 'audio_url'".to_string(),
        ));
    }

    let (staged_path, original_name) = if let Some((original, data)) = form.file {
        let extension = original
            .as_deref()
            .and_then(filename_extension)
            .unwrap_or_else(|| ".mp3".to_string());
        let path = StoragePath::staged(&extension);
        tracing::info!(path = %path, bytes = data.len(), "Staging uploaded audio");

        let stream = futures::stream::once(async move { Ok::<_, std::io::Error>(data) }).boxed();
        state
            .staging
            .store(&path, stream)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to stage upload: {}", e)))?;
        (path, original)
    } else if let Some(url) = form.audio_url {
        let content_type = state.audio_fetcher.probe_content_type(&url).await;
        let extension = guess_extension(&url, content_type.as_deref());
        let path = StoragePath::staged(&extension);
        tracing::info!(url = %url, path = %path, "Staging audio from URL");

        let stream = state.audio_fetcher.download(&url).await.map_err(|e| {
            ApiError::DownstreamFetch(match e {
                FetchError::BadStatus { status } => format!(
                    "Failed to download audio from URL: {}. Server responded with {}.",
                    url, status
                ),
                FetchError::Request(message) => {
                    format!("Failed to download audio from URL: {}. {}", url, message)
                }
            })
        })?;
        state.staging.store(&path, stream).await.map_err(|e| {
            ApiError::DownstreamFetch(format!("Failed to download audio from URL: {}. {}", url, e))
        })?;
        (path, url_basename(&url))
    } else {
        return Err(ApiError::Validation(
            "Must provide 'file' or 'audio_url'".to_string(),
        ));
    };

    let display_name = sanitize_filename(
        form.filename
            .or(original_name)
            .as_deref()
            .unwrap_or("untitled"),
    );

    let data = JobData {
        filename: display_name,
        language: form.language,
        model: form
            .model
            .unwrap_or_else(|| state.settings.transcription.default_model.clone()),
        task: form.task.unwrap_or_else(|| "transcribe".to_string()),
        webhook_url: form.webhook_url,
    };

    let job = Job::new(data, staged_path);
    let job_id = state
        .dispatcher
        .enqueue(job)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to enqueue job: {}", e)))?;

    Ok(Json(EnqueueResponse {
        job_id: job_id.to_string(),
    }))
}

async fn read_form(multipart: &mut Multipart) -> Result<TranscribeForm, ApiError> {
    let mut form = TranscribeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let original = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Failed to read file: {}", e)))?;
                form.file = Some((original, data));
            }
            "audio_url" => form.audio_url = text_value(field).await?,
            "filename" => form.filename = text_value(field).await?,
            "language" => form.language = text_value(field).await?,
            "model" => form.model = text_value(field).await?,
            "task" => form.task = text_value(field).await?,
            "webhook_url" => form.webhook_url = text_value(field).await?,
            _ => {}
        }
    }

    Ok(form)
}

async fn text_value(field: Field<'_>) -> Result<Option<String>, ApiError> {
    let value = field
        .text()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read form field: {}", e)))?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

fn filename_extension(name: &str) -> Option<String> {
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 == name.len() {
        return None;
    }
    Some(name[dot..].to_ascii_lowercase())
}

/// ASCII-safe display filename: path components stripped, whitespace
/// collapsed to underscores, anything outside `[A-Za-z0-9._-]` dropped.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let mut out = String::with_capacity(base.len());
    let mut last_was_space = false;

    for ch in base.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            out.push(ch);
            last_was_space = false;
        } else if ch.is_whitespace() && !last_was_space {
            out.push('_');
            last_was_space = true;
        }
    }

    let trimmed = out.trim_matches(['.', '_'].as_slice());
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

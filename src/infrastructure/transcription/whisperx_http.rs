use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};

use crate::application::ports::{SpeechModel, TranscriptionError};
use crate::domain::{Segment, TranscriptResult};
use crate::infrastructure::transcription::ModelLoader;

/// Client for a whisperx-compatible inference sidecar. The sidecar owns
/// the actual model weights; a "load" here warms the named model so the
/// first job does not pay the cold-start cost.
pub struct WhisperXHttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl WhisperXHttpClient {
    pub fn new(base_url: String, request_timeout: Duration) -> Result<Self, TranscriptionError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("client: {}", e)))?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ModelLoader for WhisperXHttpClient {
    async fn load(&self, name: &str) -> Result<Arc<dyn SpeechModel>, TranscriptionError> {
        let url = format!("{}/v1/models/{}/load", self.base_url, name);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ModelLoadFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        Ok(Arc::new(WhisperXHttpModel {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            model: name.to_string(),
        }))
    }
}

pub struct WhisperXHttpModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    text: String,
    segments: Vec<Segment>,
    language: String,
}

#[derive(Serialize)]
struct AlignTextRequest<'a> {
    language: &'a str,
    segments: &'a [Segment],
}

#[derive(Deserialize)]
struct AlignResponse {
    segments: Vec<Segment>,
}

#[async_trait]
impl SpeechModel for WhisperXHttpModel {
    async fn transcribe(
        &self,
        audio: &[u8],
        task: &str,
    ) -> Result<TranscriptResult, TranscriptionError> {
        let url = format!("{}/v1/transcribe", self.base_url);

        let file_part = multipart::Part::bytes(audio.to_vec())
            .file_name("audio")
            .mime_str("application/octet-stream")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("task", task.to_string())
            .part("file", file_part);

        tracing::debug!(model = %self.model, bytes = audio.len(), "Sending audio for transcription");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::TranscriptionFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let payload: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("body: {}", e)))?;

        Ok(TranscriptResult {
            text: payload.text,
            segments: payload.segments,
            language: payload.language,
        })
    }

    async fn align(
        &self,
        transcript: TranscriptResult,
        audio: &[u8],
    ) -> Result<TranscriptResult, TranscriptionError> {
        let url = format!("{}/v1/align", self.base_url);

        let segments_json = serde_json::to_string(&AlignTextRequest {
            language: &transcript.language,
            segments: &transcript.segments,
        })
        .map_err(|e| TranscriptionError::AlignmentFailed(format!("encode: {}", e)))?;

        let file_part = multipart::Part::bytes(audio.to_vec())
            .file_name("audio")
            .mime_str("application/octet-stream")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("transcript", segments_json)
            .part("file", file_part);

        tracing::debug!(language = %transcript.language, "Sending segments for alignment");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::AlignmentFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let payload: AlignResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::AlignmentFailed(format!("body: {}", e)))?;

        Ok(TranscriptResult {
            segments: payload.segments,
            ..transcript
        })
    }
}

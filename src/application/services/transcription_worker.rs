use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::application::ports::{
    ModelProvider, StagingStore, StagingStoreError, TranscriptionError, WebhookNotifier,
};
use crate::application::services::caption_renderer::{self, CaptionLimits};
use crate::application::services::Dispatcher;
use crate::domain::{Job, ResultEnvelope, TranscriptResult};

/// One member of the worker pool: claims a job, runs the transcription
/// pipeline under the job timeout, reports the outcome, and always
/// removes the staged audio afterwards.
pub struct TranscriptionWorker {
    id: usize,
    dispatcher: Arc<Dispatcher>,
    staging: Arc<dyn StagingStore>,
    models: Arc<dyn ModelProvider>,
    webhooks: Arc<dyn WebhookNotifier>,
    captions: CaptionLimits,
    job_timeout: Duration,
}

impl TranscriptionWorker {
    pub fn new(
        id: usize,
        dispatcher: Arc<Dispatcher>,
        staging: Arc<dyn StagingStore>,
        models: Arc<dyn ModelProvider>,
        webhooks: Arc<dyn WebhookNotifier>,
        captions: CaptionLimits,
        job_timeout: Duration,
    ) -> Self {
        Self {
            id,
            dispatcher,
            staging,
            models,
            webhooks,
            captions,
            job_timeout,
        }
    }

    pub async fn run(self) {
        tracing::info!(worker_id = self.id, "Transcription worker started");
        loop {
            let job = match self.dispatcher.claim().await {
                Ok(job) => job,
                Err(e) => {
                    tracing::error!(worker_id = self.id, error = %e, "Failed to claim job");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            let span = tracing::info_span!(
                "transcription_job",
                worker_id = self.id,
                job_id = %job.id,
                filename = %job.data.filename,
            );
            self.handle_job(job).instrument(span).await;
        }
    }

    async fn handle_job(&self, job: Job) {
        let id = job.id;
        let audio_path = job.audio_path.clone();

        let outcome = tokio::time::timeout(self.job_timeout, self.execute_pipeline(&job)).await;

        let report = match outcome {
            Ok(envelope) => self.dispatcher.report_success(id, envelope).await,
            Err(_) => {
                let fault = format!(
                    "job exceeded maximum execution time of {}s",
                    self.job_timeout.as_secs()
                );
                self.dispatcher.report_failure(id, &fault).await
            }
        };
        if let Err(e) = report {
            tracing::error!(error = %e, "Failed to record job outcome");
        }

        // Staged audio is removed on every exit path.
        if let Err(e) = self.staging.delete(&audio_path).await {
            tracing::warn!(error = %e, path = %audio_path, "Failed to delete staged audio");
        }
    }

    /// Any pipeline error is folded into a content-level error envelope
    /// on a job that still finishes; only timeouts and reporting faults
    /// land a job in the failed registry.
    async fn execute_pipeline(&self, job: &Job) -> ResultEnvelope {
        match self.transcribe_and_render(job).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "Transcription pipeline failed");
                ResultEnvelope::Error {
                    error: e.to_string(),
                    filename: job.data.filename.clone(),
                }
            }
        }
    }

    async fn transcribe_and_render(&self, job: &Job) -> Result<ResultEnvelope, PipelineError> {
        let audio = self
            .staging
            .fetch(&job.audio_path)
            .await
            .map_err(PipelineError::Staging)?;

        let model = self
            .models
            .get(&job.data.model)
            .await
            .map_err(PipelineError::Model)?;

        let transcript = model
            .transcribe(&audio, &job.data.task)
            .await
            .map_err(PipelineError::Transcription)?;
        let detected_language = transcript.language.clone();

        let aligned = model
            .align(transcript, &audio)
            .await
            .map_err(PipelineError::Alignment)?;

        tracing::info!(
            language = %detected_language,
            segments = aligned.segments.len(),
            "Transcription completed"
        );

        // A client-supplied language only retags the outputs; wrap
        // limits always follow the detected language.
        let wrap = self.captions.for_language(&detected_language);
        let tagged = TranscriptResult {
            language: job
                .data
                .language
                .clone()
                .unwrap_or_else(|| detected_language.clone()),
            ..aligned
        };

        let outputs =
            caption_renderer::render_outputs(&tagged, wrap).map_err(PipelineError::Rendering)?;

        let mut envelope = ResultEnvelope::Done {
            filename: job.data.filename.clone(),
            outputs,
            webhook_error: None,
        };

        if let Some(url) = &job.data.webhook_url {
            tracing::info!(url = %url, "Sending webhook");
            if let Err(e) = self.webhooks.notify(url, &envelope).await {
                tracing::error!(error = %e, url = %url, "Webhook delivery failed");
                if let ResultEnvelope::Done { webhook_error, .. } = &mut envelope {
                    *webhook_error = Some(e.to_string());
                }
            }
        }

        Ok(envelope)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("staging store: {0}")]
    Staging(StagingStoreError),
    #[error("model loading: {0}")]
    Model(TranscriptionError),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
    #[error("alignment: {0}")]
    Alignment(TranscriptionError),
    #[error("caption rendering: {0}")]
    Rendering(serde_json::Error),
}

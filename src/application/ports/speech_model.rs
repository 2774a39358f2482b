use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::TranscriptResult;

/// A loaded speech-to-text model, treated as an opaque collaborator.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Run inference over the raw audio bytes. `task` is `transcribe`
    /// or `translate`. The result carries the detected language.
    async fn transcribe(
        &self,
        audio: &[u8],
        task: &str,
    ) -> Result<TranscriptResult, TranscriptionError>;

    /// Refine segment and word timestamps against the audio signal,
    /// keyed by the transcript's detected language.
    async fn align(
        &self,
        transcript: TranscriptResult,
        audio: &[u8],
    ) -> Result<TranscriptResult, TranscriptionError>;
}

/// Hands out model instances by name. Implementations load lazily and
/// cache, guarding against duplicate loads with a per-name lock.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn get(&self, name: &str) -> Result<Arc<dyn SpeechModel>, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("alignment failed: {0}")]
    AlignmentFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}

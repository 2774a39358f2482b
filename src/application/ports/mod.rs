mod job_store;
mod speech_model;
mod staging_store;
mod webhook_notifier;

pub use job_store::{JobCounters, JobStore, JobStoreError, RegistrySizes};
pub use speech_model::{ModelProvider, SpeechModel, TranscriptionError};
pub use staging_store::{StagingStore, StagingStoreError};
pub use webhook_notifier::{WebhookError, WebhookNotifier};

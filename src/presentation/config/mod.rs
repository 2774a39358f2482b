mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    CaptionSettings, IngestSettings, LoggingSettings, QueueSettings, ServerSettings, Settings,
    StorageSettings, TranscriptionSettings, WebhookSettings,
};

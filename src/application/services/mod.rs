pub mod caption_renderer;
mod dispatcher;
mod transcription_worker;

pub use caption_renderer::{CaptionLimits, LineWrap};
pub use dispatcher::Dispatcher;
pub use transcription_worker::{PipelineError, TranscriptionWorker};

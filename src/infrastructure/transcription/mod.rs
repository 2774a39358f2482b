mod caching_provider;
mod whisperx_http;

pub use caching_provider::{CachingModelProvider, ModelLoader};
pub use whisperx_http::{WhisperXHttpClient, WhisperXHttpModel};

use std::sync::Arc;

use crate::application::ports::{JobStore, StagingStore};
use crate::application::services::Dispatcher;
use crate::infrastructure::ingest::RemoteAudioFetcher;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub staging: Arc<dyn StagingStore>,
    pub audio_fetcher: Arc<RemoteAudioFetcher>,
    pub settings: Arc<Settings>,
}

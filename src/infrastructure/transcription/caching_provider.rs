use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OnceCell};

use crate::application::ports::{ModelProvider, SpeechModel, TranscriptionError};

/// Produces a model instance for a given identifier. Loading may be
/// expensive (weights pulled into memory, a sidecar warming up).
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, name: &str) -> Result<Arc<dyn SpeechModel>, TranscriptionError>;
}

type ModelCell = Arc<OnceCell<Arc<dyn SpeechModel>>>;

/// Lazily loads and caches models, guarded per model name so two
/// workers requesting the same model never load it twice while loads
/// for different models proceed concurrently.
pub struct CachingModelProvider<L> {
    loader: L,
    cells: Mutex<HashMap<String, ModelCell>>,
}

impl<L> CachingModelProvider<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            cells: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<L: ModelLoader> ModelProvider for CachingModelProvider<L> {
    async fn get(&self, name: &str) -> Result<Arc<dyn SpeechModel>, TranscriptionError> {
        let cell = {
            let mut cells = self.cells.lock().await;
            Arc::clone(
                cells
                    .entry(name.to_string())
                    .or_insert_with(|| Arc::new(OnceCell::new())),
            )
        };

        let model = cell
            .get_or_try_init(|| async {
                tracing::info!(model = %name, "Loading speech model");
                self.loader.load(name).await
            })
            .await?;

        Ok(Arc::clone(model))
    }
}

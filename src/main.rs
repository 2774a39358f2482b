use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use skald::application::ports::{JobStore, ModelProvider, StagingStore, WebhookNotifier};
use skald::application::services::{Dispatcher, TranscriptionWorker};
use skald::infrastructure::ingest::RemoteAudioFetcher;
use skald::infrastructure::job_store::InMemoryJobStore;
use skald::infrastructure::observability::{init_tracing, TracingConfig};
use skald::infrastructure::storage::SharedDirStore;
use skald::infrastructure::transcription::{CachingModelProvider, WhisperXHttpClient};
use skald::infrastructure::webhook::HttpWebhookNotifier;
use skald::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(
        TracingConfig {
            environment: environment.to_string(),
            level: settings.logging.level.clone(),
            json_format: settings.logging.enable_json,
        },
        settings.server.port,
    );

    let staging: Arc<dyn StagingStore> = Arc::new(SharedDirStore::new(PathBuf::from(
        &settings.storage.shared_dir,
    ))?);
    let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new(Duration::from_secs(
        settings.queue.result_ttl_secs,
    )));
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store), Arc::clone(&staging)));

    let loader = WhisperXHttpClient::new(
        settings.transcription.engine_url.clone(),
        Duration::from_secs(settings.transcription.request_timeout_secs),
    )?;
    let models: Arc<dyn ModelProvider> = Arc::new(CachingModelProvider::new(loader));
    let webhooks: Arc<dyn WebhookNotifier> = Arc::new(HttpWebhookNotifier::new(
        Duration::from_secs(settings.webhook.timeout_secs),
    )?);

    for worker_id in 0..settings.queue.workers {
        let worker = TranscriptionWorker::new(
            worker_id,
            Arc::clone(&dispatcher),
            Arc::clone(&staging),
            Arc::clone(&models),
            Arc::clone(&webhooks),
            settings.captions.limits(),
            Duration::from_secs(settings.queue.job_timeout_secs),
        );
        tokio::spawn(worker.run());
    }
    tokio::spawn(
        Arc::clone(&dispatcher)
            .run_expiry_sweeper(Duration::from_secs(settings.queue.sweep_interval_secs)),
    );

    let audio_fetcher = Arc::new(RemoteAudioFetcher::new(
        Duration::from_secs(settings.ingest.head_timeout_secs),
        Duration::from_secs(settings.ingest.download_timeout_secs),
    )?);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);

    let state = AppState {
        store,
        dispatcher,
        staging,
        audio_fetcher,
        settings: Arc::new(settings),
    };
    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

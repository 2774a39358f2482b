use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

use crate::application::ports::{JobStore, JobStoreError, StagingStore};
use crate::domain::{Job, JobId, ResultEnvelope};

/// Hands work to the worker pool and records outcomes.
///
/// State machine per job: queued -> started -> finished | failed.
/// Transitions are driven by worker claim and report calls, never
/// self-initiated.
pub struct Dispatcher {
    store: Arc<dyn JobStore>,
    staging: Arc<dyn StagingStore>,
    work_available: Notify,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn JobStore>, staging: Arc<dyn StagingStore>) -> Self {
        Self {
            store,
            staging,
            work_available: Notify::new(),
        }
    }

    /// Append a job to the pending registry and wake one claimer. Safe
    /// under concurrent submissions.
    pub async fn enqueue(&self, job: Job) -> Result<JobId, JobStoreError> {
        let id = job.id;
        self.store.create(&job).await?;
        self.work_available.notify_one();
        tracing::info!(job_id = %id, model = %job.data.model, "Job enqueued");
        Ok(id)
    }

    /// Take the next pending job, blocking until one is available.
    /// Claims are exactly-once across all workers.
    pub async fn claim(&self) -> Result<Job, JobStoreError> {
        loop {
            if let Some(job) = self.store.claim_next().await? {
                tracing::debug!(job_id = %job.id, "Job claimed");
                return Ok(job);
            }
            self.work_available.notified().await;
        }
    }

    pub async fn report_success(
        &self,
        id: JobId,
        envelope: ResultEnvelope,
    ) -> Result<(), JobStoreError> {
        let content_error = envelope.is_error();
        self.store.complete(id, envelope).await?;
        tracing::info!(job_id = %id, content_error, "Job finished");
        Ok(())
    }

    pub async fn report_failure(&self, id: JobId, fault: &str) -> Result<(), JobStoreError> {
        self.store.fail(id, fault).await?;
        tracing::error!(job_id = %id, fault = %fault, "Job failed");
        Ok(())
    }

    /// Delete a still-queued job and its staged audio. Any other status
    /// is a conflict.
    pub async fn delete(&self, id: JobId) -> Result<(), JobStoreError> {
        let job = self.store.delete(id).await?;
        if let Err(e) = self.staging.delete(&job.audio_path).await {
            tracing::warn!(
                error = %e,
                path = %job.audio_path,
                "Failed to delete staged audio for cancelled job"
            );
        }
        tracing::info!(job_id = %id, "Queued job deleted");
        Ok(())
    }

    /// Periodically drop terminal records whose result TTL elapsed.
    pub async fn run_expiry_sweeper(self: Arc<Self>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match self.store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::debug!(purged, "Expired job records purged"),
                Err(e) => tracing::warn!(error = %e, "Expiry sweep failed"),
            }
        }
    }
}

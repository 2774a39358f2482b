use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Job, JobId, JobStatus, ResultEnvelope};

/// Permanent tallies of terminal transitions. Monotonic, independent of
/// registry membership, and unaffected by result-TTL expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobCounters {
    pub completed: u64,
    pub failed: u64,
}

/// Live sizes of the four status registries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySizes {
    pub queued: usize,
    pub started: usize,
    pub finished: usize,
    pub failed: usize,
}

/// Durable mapping of job id to record, plus status-indexed registries.
///
/// A job is a member of exactly one registry at any observable instant.
/// The generic status transition is exposed as the three legal moves:
/// `claim_next` (queued -> started), `complete` (started -> finished)
/// and `fail` (started -> failed).
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a queued record and append it to the pending registry.
    async fn create(&self, job: &Job) -> Result<(), JobStoreError>;

    async fn get(&self, id: JobId) -> Result<Option<Job>, JobStoreError>;

    /// Ids currently in the registry for `status`; pending queue order
    /// for `Queued`, no ordering guarantee for the others.
    async fn list_ids(&self, status: JobStatus) -> Result<Vec<JobId>, JobStoreError>;

    /// Atomically remove one job from pending and mark it started.
    /// Exactly-once across concurrent callers.
    async fn claim_next(&self) -> Result<Option<Job>, JobStoreError>;

    /// Attach the result envelope, move the job to the finished
    /// registry and bump the completed counter, atomically.
    async fn complete(&self, id: JobId, envelope: ResultEnvelope) -> Result<(), JobStoreError>;

    /// Record a worker fault, move the job to the failed registry and
    /// bump the failed counter, atomically. No envelope is attached.
    async fn fail(&self, id: JobId, fault: &str) -> Result<(), JobStoreError>;

    /// Remove a queued record; `Conflict` for any other status.
    /// Returns the removed record so staged audio can be cleaned up.
    async fn delete(&self, id: JobId) -> Result<Job, JobStoreError>;

    async fn counters(&self) -> Result<JobCounters, JobStoreError>;

    async fn registry_sizes(&self) -> Result<RegistrySizes, JobStoreError>;

    /// Drop terminal records whose result TTL has elapsed. Counters are
    /// untouched. Returns the number of purged records.
    async fn purge_expired(&self) -> Result<usize, JobStoreError>;

    /// Reachability probe for the health endpoint.
    async fn ping(&self) -> Result<(), JobStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum JobStoreError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job {id} cannot be deleted because its status is '{status}'")]
    Conflict { id: JobId, status: JobStatus },
    #[error("illegal transition for job {id}: {from} -> {to}")]
    InvalidTransition {
        id: JobId,
        from: JobStatus,
        to: JobStatus,
    },
    #[error("duplicate job id: {0}")]
    DuplicateId(JobId),
    #[error("job store backend: {0}")]
    Backend(String),
}

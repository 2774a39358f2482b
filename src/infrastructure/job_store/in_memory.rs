use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::ports::{JobCounters, JobStore, JobStoreError, RegistrySizes};
use crate::domain::{Job, JobId, JobStatus, ResultEnvelope};

#[derive(Default)]
struct Registries {
    jobs: HashMap<JobId, Job>,
    pending: VecDeque<JobId>,
    started: Vec<JobId>,
    finished: Vec<JobId>,
    failed: Vec<JobId>,
    completed_total: u64,
    failed_total: u64,
}

impl Registries {
    fn remove_from_registry(&mut self, id: JobId, status: JobStatus) {
        match status {
            JobStatus::Queued => self.pending.retain(|member| *member != id),
            JobStatus::Started => self.started.retain(|member| *member != id),
            JobStatus::Finished => self.finished.retain(|member| *member != id),
            JobStatus::Failed => self.failed.retain(|member| *member != id),
        }
    }
}

/// Process-local job store. All registry moves happen under one lock,
/// so a job is observably a member of exactly one registry and status
/// reads never see a transition half-applied.
pub struct InMemoryJobStore {
    inner: Mutex<Registries>,
    result_ttl: chrono::Duration,
}

impl InMemoryJobStore {
    pub fn new(result_ttl: Duration) -> Self {
        let result_ttl =
            chrono::Duration::from_std(result_ttl).unwrap_or_else(|_| chrono::Duration::days(365));
        Self {
            inner: Mutex::new(Registries::default()),
            result_ttl,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Registries>, JobStoreError> {
        self.inner
            .lock()
            .map_err(|_| JobStoreError::Backend("job store lock poisoned".to_string()))
    }

    fn finish(
        &self,
        id: JobId,
        to: JobStatus,
        envelope: Option<ResultEnvelope>,
        fault: Option<&str>,
    ) -> Result<(), JobStoreError> {
        let mut inner = self.lock()?;
        let job = inner.jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;
        if job.status != JobStatus::Started {
            return Err(JobStoreError::InvalidTransition {
                id,
                from: job.status,
                to,
            });
        }

        let now = Utc::now();
        job.status = to;
        job.result = envelope;
        job.fault = fault.map(str::to_string);
        job.finished_at = Some(now);
        job.expires_at = Some(now + self.result_ttl);

        inner.remove_from_registry(id, JobStatus::Started);
        match to {
            JobStatus::Finished => {
                inner.finished.push(id);
                inner.completed_total += 1;
            }
            JobStatus::Failed => {
                inner.failed.push(id);
                inner.failed_total += 1;
            }
            _ => unreachable!("finish only targets terminal statuses"),
        }
        Ok(())
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: &Job) -> Result<(), JobStoreError> {
        let mut inner = self.lock()?;
        if inner.jobs.contains_key(&job.id) {
            return Err(JobStoreError::DuplicateId(job.id));
        }
        inner.jobs.insert(job.id, job.clone());
        inner.pending.push_back(job.id);
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Option<Job>, JobStoreError> {
        let inner = self.lock()?;
        Ok(inner.jobs.get(&id).cloned())
    }

    async fn list_ids(&self, status: JobStatus) -> Result<Vec<JobId>, JobStoreError> {
        let inner = self.lock()?;
        let ids = match status {
            JobStatus::Queued => inner.pending.iter().copied().collect(),
            JobStatus::Started => inner.started.clone(),
            JobStatus::Finished => inner.finished.clone(),
            JobStatus::Failed => inner.failed.clone(),
        };
        Ok(ids)
    }

    async fn claim_next(&self) -> Result<Option<Job>, JobStoreError> {
        let mut inner = self.lock()?;
        while let Some(id) = inner.pending.pop_front() {
            if let Some(job) = inner.jobs.get_mut(&id) {
                job.status = JobStatus::Started;
                let claimed = job.clone();
                inner.started.push(id);
                return Ok(Some(claimed));
            }
        }
        Ok(None)
    }

    async fn complete(&self, id: JobId, envelope: ResultEnvelope) -> Result<(), JobStoreError> {
        self.finish(id, JobStatus::Finished, Some(envelope), None)
    }

    async fn fail(&self, id: JobId, fault: &str) -> Result<(), JobStoreError> {
        self.finish(id, JobStatus::Failed, None, Some(fault))
    }

    async fn delete(&self, id: JobId) -> Result<Job, JobStoreError> {
        let mut inner = self.lock()?;
        let status = inner
            .jobs
            .get(&id)
            .map(|job| job.status)
            .ok_or(JobStoreError::NotFound(id))?;
        if status != JobStatus::Queued {
            return Err(JobStoreError::Conflict { id, status });
        }
        inner.remove_from_registry(id, JobStatus::Queued);
        let job = inner
            .jobs
            .remove(&id)
            .ok_or(JobStoreError::NotFound(id))?;
        Ok(job)
    }

    async fn counters(&self) -> Result<JobCounters, JobStoreError> {
        let inner = self.lock()?;
        Ok(JobCounters {
            completed: inner.completed_total,
            failed: inner.failed_total,
        })
    }

    async fn registry_sizes(&self) -> Result<RegistrySizes, JobStoreError> {
        let inner = self.lock()?;
        Ok(RegistrySizes {
            queued: inner.pending.len(),
            started: inner.started.len(),
            finished: inner.finished.len(),
            failed: inner.failed.len(),
        })
    }

    async fn purge_expired(&self) -> Result<usize, JobStoreError> {
        let now = Utc::now();
        let mut inner = self.lock()?;
        let expired: Vec<JobId> = inner
            .jobs
            .values()
            .filter(|job| {
                job.status.is_terminal()
                    && job.expires_at.is_some_and(|expires| expires <= now)
            })
            .map(|job| job.id)
            .collect();

        for id in &expired {
            if let Some(job) = inner.jobs.remove(id) {
                inner.remove_from_registry(*id, job.status);
            }
        }
        Ok(expired.len())
    }

    async fn ping(&self) -> Result<(), JobStoreError> {
        self.lock().map(|_| ())
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{JobStatus, ResultEnvelope, StoragePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-supplied request parameters, immutable for the job's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobData {
    pub filename: String,
    pub language: Option<String>,
    pub model: String,
    pub task: String,
    pub webhook_url: Option<String>,
}

/// One transcription request's full lifecycle record.
///
/// The store owns the record; the dispatcher mutates `status`, and the
/// worker attaches `result` (or `fault`) exactly once at the terminal
/// transition.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub data: JobData,
    pub audio_path: StoragePath,
    pub status: JobStatus,
    pub result: Option<ResultEnvelope>,
    pub fault: Option<String>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(data: JobData, audio_path: StoragePath) -> Self {
        Self {
            id: JobId::new(),
            data,
            audio_path,
            status: JobStatus::Queued,
            result: None,
            fault: None,
            created_at: Utc::now(),
            finished_at: None,
            expires_at: None,
        }
    }
}

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;

use skald::application::ports::{
    JobStore, JobStoreError, StagingStore, StagingStoreError,
};
use skald::application::services::Dispatcher;
use skald::domain::{
    CaptionOutputs, Job, JobData, JobStatus, ResultEnvelope, StoragePath,
};
use skald::infrastructure::job_store::InMemoryJobStore;

struct RecordingStagingStore {
    deleted: Mutex<Vec<String>>,
}

impl RecordingStagingStore {
    fn new() -> Self {
        Self {
            deleted: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl StagingStore for RecordingStagingStore {
    async fn store(
        &self,
        _path: &StoragePath,
        _stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError> {
        Ok(0)
    }

    async fn fetch(&self, _path: &StoragePath) -> Result<Vec<u8>, StagingStoreError> {
        Ok(vec![])
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        self.deleted.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

fn test_job(filename: &str) -> Job {
    Job::new(
        JobData {
            filename: filename.to_string(),
            language: None,
            model: "large-v3".to_string(),
            task: "transcribe".to_string(),
            webhook_url: None,
        },
        StoragePath::staged(".mp3"),
    )
}

fn done_envelope(filename: &str) -> ResultEnvelope {
    ResultEnvelope::Done {
        filename: filename.to_string(),
        outputs: CaptionOutputs {
            text: "hi".to_string(),
            vtt: "WEBVTT\n".to_string(),
            srt: "1\n00:00:00,000 --> 00:00:01,000\nhi\n".to_string(),
            words: "WEBVTT\n".to_string(),
            json: "{\"segments\":[],\"language\":\"en\"}".to_string(),
        },
        webhook_error: None,
    }
}

async fn registry_membership(store: &InMemoryJobStore, job: &Job) -> Vec<JobStatus> {
    let mut member_of = vec![];
    for status in [
        JobStatus::Queued,
        JobStatus::Started,
        JobStatus::Finished,
        JobStatus::Failed,
    ] {
        if store.list_ids(status).await.unwrap().contains(&job.id) {
            member_of.push(status);
        }
    }
    member_of
}

#[tokio::test]
async fn given_created_job_when_claimed_then_it_moves_to_exactly_the_started_registry() {
    let store = InMemoryJobStore::new(Duration::from_secs(3600));
    let job = test_job("a.mp3");
    store.create(&job).await.unwrap();

    assert_eq!(registry_membership(&store, &job).await, [JobStatus::Queued]);

    let claimed = store.claim_next().await.unwrap().unwrap();

    assert_eq!(claimed.id, job.id);
    assert_eq!(claimed.status, JobStatus::Started);
    assert_eq!(registry_membership(&store, &job).await, [JobStatus::Started]);
}

#[tokio::test]
async fn given_one_pending_job_when_two_claims_race_then_exactly_one_succeeds() {
    let store = Arc::new(InMemoryJobStore::new(Duration::from_secs(3600)));
    store.create(&test_job("a.mp3")).await.unwrap();

    let (first, second) = tokio::join!(store.claim_next(), store.claim_next());

    let claims = [first.unwrap(), second.unwrap()];
    assert_eq!(claims.iter().filter(|claim| claim.is_some()).count(), 1);
}

#[tokio::test]
async fn given_two_jobs_when_claiming_then_pending_order_is_preserved() {
    let store = InMemoryJobStore::new(Duration::from_secs(3600));
    let first = test_job("first.mp3");
    let second = test_job("second.mp3");
    store.create(&first).await.unwrap();
    store.create(&second).await.unwrap();

    assert_eq!(
        store.list_ids(JobStatus::Queued).await.unwrap(),
        vec![first.id, second.id]
    );
    assert_eq!(store.claim_next().await.unwrap().unwrap().id, first.id);
    assert_eq!(store.claim_next().await.unwrap().unwrap().id, second.id);
}

#[tokio::test]
async fn given_started_job_when_completed_then_finished_registry_and_counter_advance() {
    let store = InMemoryJobStore::new(Duration::from_secs(3600));
    let job = test_job("a.mp3");
    store.create(&job).await.unwrap();
    store.claim_next().await.unwrap().unwrap();

    store.complete(job.id, done_envelope("a.mp3")).await.unwrap();

    assert_eq!(
        registry_membership(&store, &job).await,
        [JobStatus::Finished]
    );
    let stored = store.get(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Finished);
    assert!(stored.result.is_some());
    let counters = store.counters().await.unwrap();
    assert_eq!((counters.completed, counters.failed), (1, 0));
}

#[tokio::test]
async fn given_started_job_when_failed_then_fault_is_recorded_without_envelope() {
    let store = InMemoryJobStore::new(Duration::from_secs(3600));
    let job = test_job("a.mp3");
    store.create(&job).await.unwrap();
    store.claim_next().await.unwrap().unwrap();

    store.fail(job.id, "worker crashed").await.unwrap();

    assert_eq!(registry_membership(&store, &job).await, [JobStatus::Failed]);
    let stored = store.get(job.id).await.unwrap().unwrap();
    assert!(stored.result.is_none());
    assert_eq!(stored.fault.as_deref(), Some("worker crashed"));
    let counters = store.counters().await.unwrap();
    assert_eq!((counters.completed, counters.failed), (0, 1));
}

#[tokio::test]
async fn given_unclaimed_job_when_completed_then_transition_is_rejected() {
    let store = InMemoryJobStore::new(Duration::from_secs(3600));
    let job = test_job("a.mp3");
    store.create(&job).await.unwrap();

    let result = store.complete(job.id, done_envelope("a.mp3")).await;

    assert!(matches!(
        result,
        Err(JobStoreError::InvalidTransition { .. })
    ));
    assert_eq!(registry_membership(&store, &job).await, [JobStatus::Queued]);
}

#[tokio::test]
async fn given_finished_job_when_completed_again_then_transition_is_rejected() {
    let store = InMemoryJobStore::new(Duration::from_secs(3600));
    let job = test_job("a.mp3");
    store.create(&job).await.unwrap();
    store.claim_next().await.unwrap().unwrap();
    store.complete(job.id, done_envelope("a.mp3")).await.unwrap();

    let again = store.complete(job.id, done_envelope("a.mp3")).await;

    assert!(matches!(
        again,
        Err(JobStoreError::InvalidTransition { .. })
    ));
    let counters = store.counters().await.unwrap();
    assert_eq!(counters.completed, 1);
}

#[tokio::test]
async fn given_queued_job_when_deleted_then_it_leaves_the_pending_registry() {
    let store = InMemoryJobStore::new(Duration::from_secs(3600));
    let job = test_job("a.mp3");
    store.create(&job).await.unwrap();

    store.delete(job.id).await.unwrap();

    assert!(store.get(job.id).await.unwrap().is_none());
    assert!(store.list_ids(JobStatus::Queued).await.unwrap().is_empty());
}

#[tokio::test]
async fn given_started_or_terminal_job_when_deleted_then_conflict() {
    let store = InMemoryJobStore::new(Duration::from_secs(3600));
    let job = test_job("a.mp3");
    store.create(&job).await.unwrap();
    store.claim_next().await.unwrap().unwrap();

    assert!(matches!(
        store.delete(job.id).await,
        Err(JobStoreError::Conflict { .. })
    ));

    store.complete(job.id, done_envelope("a.mp3")).await.unwrap();

    assert!(matches!(
        store.delete(job.id).await,
        Err(JobStoreError::Conflict { .. })
    ));
}

#[tokio::test]
async fn given_zero_ttl_when_purging_then_records_vanish_but_counters_remain() {
    let store = InMemoryJobStore::new(Duration::ZERO);
    let job = test_job("a.mp3");
    store.create(&job).await.unwrap();
    store.claim_next().await.unwrap().unwrap();
    store.complete(job.id, done_envelope("a.mp3")).await.unwrap();

    let purged = store.purge_expired().await.unwrap();

    assert_eq!(purged, 1);
    assert!(store.get(job.id).await.unwrap().is_none());
    assert!(store
        .list_ids(JobStatus::Finished)
        .await
        .unwrap()
        .is_empty());
    let counters = store.counters().await.unwrap();
    assert_eq!(counters.completed, 1);
}

#[tokio::test]
async fn given_long_ttl_when_purging_then_fresh_records_survive() {
    let store = InMemoryJobStore::new(Duration::from_secs(3600));
    let job = test_job("a.mp3");
    store.create(&job).await.unwrap();
    store.claim_next().await.unwrap().unwrap();
    store.fail(job.id, "boom").await.unwrap();

    let purged = store.purge_expired().await.unwrap();

    assert_eq!(purged, 0);
    assert!(store.get(job.id).await.unwrap().is_some());
}

#[tokio::test]
async fn given_empty_queue_when_claiming_via_dispatcher_then_claim_blocks_until_enqueue() {
    let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new(Duration::from_secs(3600)));
    let staging = Arc::new(RecordingStagingStore::new());
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store), staging));

    let blocked =
        tokio::time::timeout(Duration::from_millis(50), dispatcher.claim()).await;
    assert!(blocked.is_err(), "claim should block on an empty queue");

    let waiter = {
        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move { dispatcher.claim().await.unwrap() })
    };
    tokio::task::yield_now().await;

    let job = test_job("a.mp3");
    let enqueued_id = dispatcher.enqueue(job).await.unwrap();

    let claimed = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("claim should resolve after enqueue")
        .unwrap();
    assert_eq!(claimed.id, enqueued_id);
}

#[tokio::test]
async fn given_queued_job_when_deleted_via_dispatcher_then_staged_audio_is_removed() {
    let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new(Duration::from_secs(3600)));
    let staging = Arc::new(RecordingStagingStore::new());
    let dispatcher = Dispatcher::new(Arc::clone(&store), Arc::clone(&staging) as _);

    let job = test_job("a.mp3");
    let audio_path = job.audio_path.to_string();
    let id = dispatcher.enqueue(job).await.unwrap();

    dispatcher.delete(id).await.unwrap();

    assert_eq!(*staging.deleted.lock().unwrap(), vec![audio_path]);
    assert!(store.get(id).await.unwrap().is_none());
}

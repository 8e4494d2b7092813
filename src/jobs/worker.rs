use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::content_store::{ContentStore, ContentStoreError};
use crate::database::Database;

use super::{thumbnail, Job, JobDispatcher, JobEnvelope, JobListener, JobReceiver, MAX_ATTEMPTS};

const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Everything a worker needs to execute jobs. Jobs read metadata and write
/// derivative artifacts; they never mutate the document or session stores.
#[derive(Clone)]
pub struct WorkerContext {
    pub database: Database,
    pub content: ContentStore,
    pub dispatcher: JobDispatcher,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Missing userId")]
    MissingUserId,

    #[error("Missing fileId")]
    MissingFileId,

    #[error("File not found")]
    FileNotFound,

    #[error("content unavailable for document {0}")]
    ContentMissing(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(#[from] ContentStoreError),

    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("resize timed out after {0:?}")]
    Timeout(Duration),

    #[error("resize task panicked: {0}")]
    Panicked(String),
}

impl JobError {
    /// A malformed payload or undecodable image is a producer bug and fails
    /// permanently; lookup, storage, and timing failures may be transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            JobError::MissingUserId | JobError::MissingFileId => false,
            JobError::Image(_) | JobError::Panicked(_) => false,
            JobError::FileNotFound
            | JobError::ContentMissing(_)
            | JobError::Database(_)
            | JobError::Storage(_)
            | JobError::Timeout(_) => true,
        }
    }
}

/// Spawn `count` worker tasks sharing the queue's receiving end.
pub fn spawn_workers(
    count: usize,
    receiver: &JobReceiver,
    ctx: WorkerContext,
    listener: Arc<dyn JobListener>,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|worker_id| {
            let receiver = receiver.clone();
            let ctx = ctx.clone();
            let listener = listener.clone();
            tokio::spawn(async move {
                tracing::debug!(worker_id, "job worker started");
                while let Some(envelope) = receiver.recv().await {
                    process(envelope, &ctx, &listener).await;
                }
                tracing::debug!(worker_id, "job worker stopped");
            })
        })
        .collect()
}

/// Run one delivery of a job, re-enqueueing it on retryable failure until
/// the attempt budget is spent.
pub async fn process(envelope: JobEnvelope, ctx: &WorkerContext, listener: &Arc<dyn JobListener>) {
    let attempt = envelope.attempts + 1;
    listener.on_active(envelope.id, attempt);

    match execute(&envelope.job, ctx).await {
        Ok(()) => listener.on_completed(envelope.id),
        Err(err) => {
            let terminal = !err.is_retryable() || attempt >= MAX_ATTEMPTS;
            listener.on_failed(envelope.id, &err, terminal);

            if !terminal {
                let dispatcher = ctx.dispatcher.clone();
                let retry = JobEnvelope {
                    attempts: attempt,
                    ..envelope
                };
                tokio::spawn(async move {
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    if let Err(err) = dispatcher.redispatch(retry) {
                        tracing::warn!("dropping retry, queue is gone: {err}");
                    }
                });
            }
        }
    }
}

pub async fn execute(job: &Job, ctx: &WorkerContext) -> Result<(), JobError> {
    match job {
        Job::MakeThumbnail { user_id, file_id } => {
            thumbnail::generate(*user_id, *file_id, ctx).await
        }
    }
}

//! Background job queue for thumbnail generation.
//!
//! A lightweight work queue built on flume channels: the upload path holds
//! a cloneable [`JobDispatcher`] and hands payloads off without blocking;
//! a pool of worker tasks shares the receiving end. Delivery is
//! at-least-once: failed jobs are re-enqueued until their attempt budget
//! runs out.

mod listener;
pub mod thumbnail;
mod worker;

pub use listener::{JobListener, TracingListener};
pub use worker::{execute, spawn_workers, JobError, WorkerContext};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum delivery attempts for a retryable job, the first included.
pub const MAX_ATTEMPTS: u32 = 3;

/// Work the queue knows how to execute.
///
/// The payload is the entire contract between producer and consumer; it is
/// serializable because it crosses the queue boundary, and the consumer
/// re-validates everything in it at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Job {
    #[serde(rename_all = "camelCase")]
    MakeThumbnail { user_id: Uuid, file_id: Uuid },
}

/// A queued job plus its delivery bookkeeping.
#[derive(Debug, Clone)]
pub struct JobEnvelope {
    pub id: Uuid,
    pub attempts: u32,
    pub job: Job,
}

impl JobEnvelope {
    fn new(job: Job) -> Self {
        Self {
            id: Uuid::new_v4(),
            attempts: 0,
            job,
        }
    }
}

/// Cloneable producer handle.
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    tx: flume::Sender<JobEnvelope>,
}

impl JobDispatcher {
    /// Create a dispatcher/receiver pair. The dispatcher can be cloned
    /// freely; the receiver feeds the worker pool.
    pub fn new() -> (Self, JobReceiver) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, JobReceiver { rx })
    }

    /// Non-blocking handoff; fails only when the worker side is gone.
    pub fn dispatch(&self, job: Job) -> anyhow::Result<()> {
        tracing::debug!(?job, "dispatching job");
        self.tx
            .send(JobEnvelope::new(job))
            .map_err(|_| anyhow::anyhow!("job receiver has been dropped"))
    }

    pub(crate) fn redispatch(&self, envelope: JobEnvelope) -> anyhow::Result<()> {
        self.tx
            .send(envelope)
            .map_err(|_| anyhow::anyhow!("job receiver has been dropped"))
    }
}

/// Consumer end of the queue; flume channels are mpmc, so the pool clones
/// this per worker.
#[derive(Debug, Clone)]
pub struct JobReceiver {
    rx: flume::Receiver<JobEnvelope>,
}

impl JobReceiver {
    /// Receive the next job, returning `None` once all dispatchers are
    /// dropped and the queue has drained.
    pub async fn recv(&self) -> Option<JobEnvelope> {
        self.rx.recv_async().await.ok()
    }

    /// Non-blocking receive.
    pub fn try_recv(&self) -> Option<JobEnvelope> {
        self.rx.try_recv().ok()
    }
}

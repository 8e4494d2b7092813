use uuid::Uuid;

use super::JobError;

/// Observer for queue-level job state transitions.
///
/// Listeners are a side channel: they see active/completed/failed events
/// but job logic never depends on them, and outcomes never feed back into
/// the document store.
pub trait JobListener: Send + Sync {
    fn on_active(&self, job_id: Uuid, attempt: u32);

    fn on_completed(&self, job_id: Uuid);

    /// `terminal` is true when the job will not be retried again.
    fn on_failed(&self, job_id: Uuid, error: &JobError, terminal: bool);
}

/// Production listener: operator-facing logs, nothing else.
pub struct TracingListener;

impl JobListener for TracingListener {
    fn on_active(&self, job_id: Uuid, attempt: u32) {
        tracing::info!(%job_id, attempt, "job started");
    }

    fn on_completed(&self, job_id: Uuid) {
        tracing::info!(%job_id, "job completed");
    }

    fn on_failed(&self, job_id: Uuid, error: &JobError, terminal: bool) {
        if terminal {
            tracing::error!(%job_id, %error, "job failed permanently");
        } else {
            tracing::warn!(%job_id, %error, "job attempt failed, will retry");
        }
    }
}

use std::time::Duration;

use crate::config::Config;
use crate::content_store::{ContentStore, ContentStoreError};
use crate::database::{Database, DatabaseSetupError};
use crate::jobs::{JobDispatcher, JobReceiver, WorkerContext};
use crate::session::SessionCache;

const MAX_SESSIONS: u64 = 100_000;

/// Shared service state: every store is constructed once here and injected
/// into handlers and workers, so tests can assemble the same pieces around
/// fakes or temp directories.
#[derive(Clone)]
pub struct AppState {
    database: Database,
    sessions: SessionCache,
    content: ContentStore,
    jobs: JobDispatcher,
    session_ttl: Duration,
}

impl AppState {
    /// Connect and await readiness of every backing store.
    ///
    /// Returns the state plus the queue's receiving end; the caller decides
    /// where the worker pool runs (see [`crate::jobs::spawn_workers`]).
    pub async fn from_config(config: &Config) -> Result<(Self, JobReceiver), StateSetupError> {
        let database = match &config.sqlite_path {
            Some(path) => Database::connect(path).await?,
            None => Database::in_memory().await?,
        };

        let content = ContentStore::new(&config.storage_root).await?;
        let sessions = SessionCache::new(MAX_SESSIONS);
        let (jobs, receiver) = JobDispatcher::new();

        Ok((
            Self {
                database,
                sessions,
                content,
                jobs,
                session_ttl: config.session_ttl,
            },
            receiver,
        ))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn sessions(&self) -> &SessionCache {
        &self.sessions
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn jobs(&self) -> &JobDispatcher {
        &self.jobs
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// The slice of state the thumbnail workers need.
    pub fn worker_context(&self) -> WorkerContext {
        WorkerContext {
            database: self.database.clone(),
            content: self.content.clone(),
            dispatcher: self.jobs.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("database setup failed: {0}")]
    Database(#[from] DatabaseSetupError),

    #[error("content store setup failed: {0}")]
    Storage(#[from] ContentStoreError),
}

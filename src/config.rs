use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Process configuration, assembled once at startup and handed to
/// [`crate::AppState::from_config`]. Nothing reads the environment after
/// this point.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address for the HTTP server to listen on.
    pub listen_addr: SocketAddr,

    /// Path to the sqlite database; an in-memory database is used when
    /// unset.
    pub sqlite_path: Option<PathBuf>,

    /// Root directory for the content store. Created if missing.
    pub storage_root: PathBuf,

    /// How long an issued session token stays valid.
    pub session_ttl: Duration,

    /// Number of thumbnail worker tasks.
    pub worker_count: usize,

    /// Log level for HTTP tracing.
    pub log_level: tracing::Level,
}

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_WORKER_COUNT: usize = 4;

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            sqlite_path: None,
            storage_root: PathBuf::from("/tmp/shelf"),
            session_ttl: DEFAULT_SESSION_TTL,
            worker_count: DEFAULT_WORKER_COUNT,
            log_level: tracing::Level::INFO,
        }
    }
}

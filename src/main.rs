use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use shelf::config::{Config, DEFAULT_SESSION_TTL, DEFAULT_WORKER_COUNT};
use shelf::jobs::{spawn_workers, TracingListener};
use shelf::{http_server, AppState};

#[derive(Debug, Parser)]
#[command(name = "shelfd", about = "Hierarchical document storage daemon")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:5000")]
    listen: SocketAddr,

    /// Path to the sqlite database (in-memory if omitted)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Root directory for stored content
    #[arg(long, default_value = "/tmp/shelf")]
    storage_root: PathBuf,

    /// Session token lifetime in seconds
    #[arg(long, default_value_t = DEFAULT_SESSION_TTL.as_secs())]
    session_ttl: u64,

    /// Number of thumbnail worker tasks
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    workers: usize,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            listen_addr: self.listen,
            sqlite_path: self.database,
            storage_root: self.storage_root,
            session_ttl: Duration::from_secs(self.session_ttl),
            worker_count: self.workers,
            log_level: tracing::Level::INFO,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config();
    let (state, job_receiver) = AppState::from_config(&config).await?;

    let _workers = spawn_workers(
        config.worker_count,
        &job_receiver,
        state.worker_context(),
        Arc::new(TracingListener),
    );
    tracing::info!(count = config.worker_count, "thumbnail workers started");

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    http_server::run(
        http_server::Config::new(config.listen_addr),
        state,
        shutdown_rx,
    )
    .await?;

    Ok(())
}

use anyhow::{Context as _, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use taskd::{config::ServerConfig, rest, storage::Storage, tasks::TaskStore, AppContext};

#[derive(Parser)]
#[command(
    name = "taskd",
    about = "taskd — minimal task-management REST service",
    version
)]
struct Args {
    /// REST API port
    #[arg(long, env = "TASKD_PORT")]
    port: Option<u16>,

    /// Data directory for config.toml and the SQLite database
    #[arg(long, env = "TASKD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "TASKD_BIND")]
    bind_address: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKD_LOG")]
    log: Option<String>,

    /// Emit logs as structured JSON instead of the compact human format
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let data_dir = args.data_dir.unwrap_or_else(|| PathBuf::from("data"));
    let mut config = ServerConfig::load(&data_dir).context("loading configuration")?;
    config.apply_overrides(args.port, args.bind_address, args.log);

    setup_logging(&config.log, args.json_logs);

    let storage = Storage::new(&data_dir)
        .await
        .context("opening task database")?;
    info!("task database ready in {}", data_dir.display());

    let ctx = Arc::new(AppContext {
        config: Arc::new(config),
        tasks: TaskStore::new(storage.pool()),
        started_at: std::time::Instant::now(),
    });

    rest::start_rest_server(ctx).await
}

fn setup_logging(log_level: &str, json: bool) {
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(log_level)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .compact()
            .init();
    }
}

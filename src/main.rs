//! # tasklist
//!
//! Task list HTTP service: opens the SQLite store, then serves `/api/tasks`
//! until interrupted.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use tasklist_server::ServerConfig;
use tasklist_store::Database;
use tasklist_telemetry::{init_telemetry, LogFormat, TelemetryConfig};

/// Task list server.
#[derive(Parser, Debug)]
#[command(name = "tasklist", about = "Task list HTTP service")]
struct Cli {
    /// Host to bind.
    #[arg(long, env = "TASKLIST_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind (0 for auto-assign).
    #[arg(long, env = "TASKLIST_PORT", default_value = "3000")]
    port: u16,

    /// Path to the `SQLite` database file, or `:memory:`.
    #[arg(long, env = "TASKLIST_DB_PATH", default_value = "./tasks.db")]
    db_path: PathBuf,

    /// Default log level. `RUST_LOG` takes precedence when set.
    #[arg(long, env = "TASKLIST_LOG_LEVEL", default_value = "info")]
    log_level: Level,

    /// Log output format: `json` or `pretty`.
    #[arg(long, env = "TASKLIST_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
}

impl Cli {
    fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level,
            format: self.log_format,
            ..TelemetryConfig::default()
        }
    }

    fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_telemetry(&cli.telemetry()).context("Failed to initialize logging")?;

    let db = Database::open(&cli.db_path)
        .with_context(|| format!("Failed to open database: {}", cli.db_path.display()))?;

    let handle = tasklist_server::start(cli.server(), db)
        .await
        .with_context(|| format!("Failed to bind {}", cli.server().socket_addr()))?;

    tracing::info!(port = handle.port, "tasklist ready");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl+c")?;

    tracing::info!("Shutting down");
    handle.shutdown();
    Ok(())
}

//! verso-daemon: the Verso collaboration and curation daemon.
//!
//! Single OS process running a Tokio async runtime. Clients communicate
//! with the daemon via JSON-RPC over Unix socket.

mod commands;
mod config;
mod rpc;

use std::sync::Arc;

use tracing::{error, info};

use crate::config::DaemonConfig;
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Database connection. A single mutex-guarded connection serializes
    /// all writes, so each RPC call observes and produces a consistent
    /// ledger without row-level locking.
    pub db: Arc<tokio::sync::Mutex<rusqlite::Connection>>,
    /// Configuration.
    pub config: DaemonConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DaemonConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("verso={}", config.advanced.log_level).parse()?),
        )
        .init();

    info!("Verso daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let db_path = data_dir.join("verso.db");
    let conn = verso_db::open(&db_path)?;
    let db = Arc::new(tokio::sync::Mutex::new(conn));

    let state = Arc::new(DaemonState { db, config });

    let socket_path = data_dir.join("daemon.sock");
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());

    info!("Starting JSON-RPC server on {:?}", socket_path);

    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    info!("Daemon shutting down gracefully");
    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(())
}

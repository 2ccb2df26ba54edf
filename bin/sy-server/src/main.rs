//! Switchyard mediation engine entry point.
//!
//! Staged startup: load env, init logging, boot the supervisor, wait
//! for a shutdown signal, let the supervisor drain in-flight work.

use anyhow::Result;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    sy_common::logging::init_logging("sy-server");

    let deployment_root = std::env::var("SWITCHYARD_DEPLOYMENT_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    info!(root = %deployment_root.display(), "starting switchyard supervisor");

    let cancellation = CancellationToken::new();
    let supervisor_cancellation = cancellation.clone();
    let supervisor = tokio::spawn(async move { sy_runtime::run(&deployment_root, supervisor_cancellation).await });

    shutdown_signal().await;
    info!("shutdown signal received, cancelling supervisor");
    cancellation.cancel();

    supervisor.await??;
    info!("switchyard shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! HTTP server initialization and runtime setup.
//!
//! Handles store opening, the recovery scan, worker spawning, and the Axum
//! server lifecycle including graceful shutdown.

use crate::application::services::{LinkService, ReportService};
use crate::config::Config;
use crate::domain::job_manager::JobManager;
use crate::domain::probe::LinkProbe;
use crate::infrastructure::persistence::FileSetRepository;
use crate::infrastructure::probe::HttpProbe;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - File-backed link set store
/// - HTTP probe
/// - Job manager (re-queues unfinished sets) and its workers
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, waits up to
/// `SHUTDOWN_TIMEOUT` for in-flight requests, then stops the workers.
///
/// # Errors
///
/// Returns an error if:
/// - The data directory cannot be opened
/// - The recovery scan fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = Arc::new(
        FileSetRepository::open(&config.data_dir)
            .await
            .with_context(|| format!("Failed to open data directory {}", config.data_dir.display()))?,
    );
    tracing::info!("Link set store opened at {}", config.data_dir.display());

    let probe: Arc<dyn LinkProbe> = Arc::new(
        HttpProbe::new(&config.probe_settings()).context("Failed to build HTTP probe client")?,
    );

    let job_manager = Arc::new(
        JobManager::new(repository.clone(), probe.clone(), config.worker_pool())
            .await
            .context("Recovery scan failed")?,
    );

    let workers = tokio::spawn({
        let job_manager = job_manager.clone();
        async move { job_manager.run().await }
    });

    let state = AppState::new(
        Arc::new(LinkService::new(
            repository.clone(),
            probe,
            config.max_links_per_set,
        )),
        Arc::new(ReportService::new(repository)),
        job_manager.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let stop_accepting = CancellationToken::new();
    let server = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(stop_accepting.clone().cancelled_owned());
    let mut server_task = tokio::spawn(async move { server.await });

    tokio::select! {
        served = &mut server_task => {
            served.context("Server task failed")??;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            stop_accepting.cancel();

            match tokio::time::timeout(config.shutdown_timeout(), &mut server_task).await {
                Ok(served) => served.context("Server task failed")??,
                Err(_) => {
                    tracing::warn!(
                        "In-flight requests still running after {}s, closing them",
                        config.shutdown_timeout
                    );
                    server_task.abort();
                }
            }
        }
    }

    job_manager.stop().await;
    workers.await.context("Worker pool task failed")?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Unable to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Unable to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! hellometrics server
//!
//! - `GET /`        : `Hello World!`
//! - `GET /metrics` : request count and latency, Prometheus text format
//!
//! Config path: first argument, else `$HELLOMETRICS_CONFIG`, else
//! `hellometrics.yaml` (optional).

use tracing_subscriber::{fmt, EnvFilter};

use hellometrics_core::error::{HelloMetricsError, Result};
use hellometrics_server::{app_state, config, router};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "hellometrics-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let explicit = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(config::CONFIG_ENV).ok());
    let cfg = config::load(explicit)?;
    let listen = cfg.server.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let buckets = state.registry().buckets().len();
    let app = router::build_router(state);

    tracing::info!(%listen, buckets, "hellometrics-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| HelloMetricsError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HelloMetricsError::Internal(format!("server failed: {e}")))?;

    tracing::info!("hellometrics-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received, draining");
}

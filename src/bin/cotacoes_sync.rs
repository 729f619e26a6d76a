use std::sync::Arc;

use anyhow::{Context, Result};
use cotacoes_frete::{AppConfig, AppState, LoadSource, TracingObserver, init_logging};
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        "Quote sync starting (api: {}, poll every {} ms)",
        config.remote.api_url, config.sync.poll_interval_ms
    );

    let state = AppState::new(config, Arc::new(TracingObserver))
        .await
        .context("failed to initialise quote sync")?;

    match state.quote_service.load().await {
        LoadSource::Remote => info!("Initial load served by the remote store"),
        LoadSource::Cache => info!("Initial load served by the local cache"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sync_handle = state.start_realtime_sync(shutdown_rx);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("Shutdown requested");

    let _ = shutdown_tx.send(true);
    if let Some(handle) = sync_handle {
        handle.await.context("sync task panicked")?;
    }

    info!("Quote sync stopped");
    Ok(())
}

//! Metrics Bridge — Entry Point
//!
//! Republishes the game API's JSON counters as Prometheus gauges.
//! Each scrape of `/metrics` fetches the upstream counters first; there
//! is no background polling. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config (TARGET_METRICS_URL, BRIDGE_LISTEN_ADDR, ...)
//! 2. Init tracing (JSON structured logging)
//! 3. Create HttpMetricsSource (3s timeout) + CounterGauges
//! 4. Spawn the bridge server
//! 5. Wait for SIGINT → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

use game_roster::adapters::metrics::{BridgeServer, CounterGauges, HttpMetricsSource};
use game_roster::config::loader::{Component, TARGET_METRICS_URL_ENV, load_config};
use game_roster::usecases::bridge::MetricsBridge;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config = load_config(Component::MetricsBridge).context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.service.log_level)
                }),
        )
        .json()
        .init();

    if std::env::var(TARGET_METRICS_URL_ENV).map_or(true, |v| v.is_empty()) {
        info!(
            target_url = %config.bridge.target_url,
            "TARGET_METRICS_URL not set, using default"
        );
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.bridge.listen,
        target_url = %config.bridge.target_url,
        timeout_ms = config.bridge.timeout_ms,
        "Configuration loaded, starting metrics bridge"
    );

    // ── 3. Source + gauges ──────────────────────────────────
    let source = HttpMetricsSource::new(
        config.bridge.target_url.clone(),
        Duration::from_millis(config.bridge.timeout_ms),
    )?;
    let gauges = CounterGauges::new().context("Failed to register gauges")?;
    let bridge = Arc::new(MetricsBridge::new(Arc::new(source), Arc::new(gauges)));

    // ── 4. Spawn the bridge server ──────────────────────────
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let server = BridgeServer::new(bridge, config.bridge.listen.clone());
    let mut server_handle = tokio::spawn(server.run(shutdown_rx));

    // ── 5. Wait for SIGINT (or the server dying on its own) ─
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
        }
        result = &mut server_handle => {
            result.context("Bridge server task panicked")??;
            warn!("Bridge server stopped without a shutdown signal");
            return Ok(());
        }
    }

    let _ = shutdown_tx.send(());

    match tokio::time::timeout(Duration::from_secs(5), server_handle).await {
        Ok(result) => result.context("Bridge server task panicked")??,
        Err(_) => warn!("Bridge server did not drain within 5s"),
    }

    info!("Shutdown complete");
    Ok(())
}

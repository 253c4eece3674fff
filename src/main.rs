//! Game API — Entry Point
//!
//! Serves the character roster over HTTP and exposes its request
//! counters on `/metrics` for the metrics bridge. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config (optional TOML + env overrides: REDIS_ADDR, LISTEN_ADDR, ...)
//! 2. Init tracing (JSON structured logging)
//! 3. Open the configured store (Redis by default, connects lazily)
//! 4. Create CharacterService + RequestCounters
//! 5. Spawn the API server
//! 6. Wait for SIGINT → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

use game_roster::adapters::http::{ApiServer, AppState};
use game_roster::adapters::persistence::open_store;
use game_roster::config::loader::{Component, load_config};
use game_roster::domain::counters::RequestCounters;
use game_roster::usecases::roster::CharacterService;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config = load_config(Component::GameApi).context("Failed to load configuration")?;

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

    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.service.listen,
        store = ?config.store.backend,
        redis = %config.store.redis_addr,
        "Configuration loaded, starting game API"
    );

    // ── 3. Open the store ───────────────────────────────────
    let store = open_store(&config.store).context("Failed to open store")?;

    // ── 4. Use case + counters ──────────────────────────────
    let roster = Arc::new(CharacterService::new(store));
    let counters = Arc::new(RequestCounters::new());
    let state = AppState::new(roster, counters);

    // ── 5. Spawn the API server ─────────────────────────────
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let server = ApiServer::new(state, config.service.listen.clone());
    let mut server_handle = tokio::spawn(server.run(shutdown_rx));

    // ── 6. Wait for SIGINT (or the server dying on its own) ─
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
        }
        result = &mut server_handle => {
            result.context("API server task panicked")??;
            warn!("API server stopped without a shutdown signal");
            return Ok(());
        }
    }

    let _ = shutdown_tx.send(());

    match tokio::time::timeout(Duration::from_secs(10), server_handle).await {
        Ok(result) => result.context("API server task panicked")??,
        Err(_) => warn!("API server did not drain within 10s"),
    }

    info!("Shutdown complete");
    Ok(())
}

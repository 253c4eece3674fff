//! Bridge Server - Scrape Endpoint for the Metrics Bridge
//!
//! Serves `/metrics` via axum 0.7. Each request runs one
//! fetch-update-encode cycle; an upstream failure becomes a 500 whose
//! body names the failure, and the process keeps serving.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::usecases::bridge::MetricsBridge;

/// Build the bridge's router.
pub fn bridge_router(bridge: Arc<MetricsBridge>) -> Router {
    Router::new()
        .route("/metrics", get(scrape))
        .with_state(bridge)
}

async fn scrape(State(bridge): State<Arc<MetricsBridge>>) -> Response {
    match bridge.scrape().await {
        Ok(exposition) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, exposition.content_type)],
            exposition.body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// HTTP server exposing the bridge's gauges.
pub struct BridgeServer {
    /// Bridge answering each scrape.
    bridge: Arc<MetricsBridge>,
    /// Bind address.
    listen: String,
}

impl BridgeServer {
    pub fn new(bridge: Arc<MetricsBridge>, listen: impl Into<String>) -> Self {
        Self {
            bridge,
            listen: listen.into(),
        }
    }

    /// Serve until a shutdown signal arrives.
    #[instrument(skip(self, shutdown_rx), fields(listen = %self.listen))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.listen).await?;
        info!(address = %self.listen, "Metrics bridge listening");

        axum::serve(listener, bridge_router(self.bridge))
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}

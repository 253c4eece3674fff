//! Roster HTTP Adapter - axum Router, Middleware, Server
//!
//! Routes:
//! - `/`        : index page
//! - `/create`  : GET form page, POST form → 201 JSON character
//! - `/list`    : roster (HTML, or JSON with `Accept: application/json`)
//! - `/metrics` : JSON request counters, polled by the metrics bridge
//! - `/health`  : liveness, always `{"status":"ok"}`
//! - `/ready`   : readiness, 503 while the store is unreachable
//!
//! Every request, including unknown routes, passes through the
//! request-counting middleware first.

pub mod form;
pub mod handlers;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::domain::counters::RequestCounters;
use crate::usecases::roster::CharacterService;

/// State shared by all roster handlers.
#[derive(Clone)]
pub struct AppState {
    /// Character use case.
    pub roster: Arc<CharacterService>,
    /// Process-wide request counters.
    pub counters: Arc<RequestCounters>,
}

impl AppState {
    pub fn new(roster: Arc<CharacterService>, counters: Arc<RequestCounters>) -> Self {
        Self { roster, counters }
    }
}

/// Build the roster router with request counting on every route.
pub fn build_router(state: AppState) -> Router {
    let counters = Arc::clone(&state.counters);

    Router::new()
        .route("/", get(handlers::index))
        .route("/create", get(handlers::create_form).post(handlers::create))
        .route("/list", get(handlers::list))
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .fallback(handlers::not_found)
        // Added after the fallback so unmatched paths are counted too.
        .layer(middleware::from_fn_with_state(counters, count_requests))
        .with_state(state)
}

/// Count the request, then hand it on.
async fn count_requests(
    State(counters): State<Arc<RequestCounters>>,
    request: Request,
    next: Next,
) -> Response {
    counters.record_request();
    next.run(request).await
}

/// HTTP server for the roster API.
pub struct ApiServer {
    /// Shared handler state.
    state: AppState,
    /// Bind address.
    listen: String,
}

impl ApiServer {
    pub fn new(state: AppState, listen: impl Into<String>) -> Self {
        Self {
            state,
            listen: listen.into(),
        }
    }

    /// Serve until a shutdown signal arrives.
    #[instrument(skip(self, shutdown_rx), fields(listen = %self.listen))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.listen).await?;
        info!(address = %self.listen, "Game API listening");

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}

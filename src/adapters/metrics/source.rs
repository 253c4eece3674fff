//! HTTP Metrics Source - Roster Counters over reqwest
//!
//! Implements the `MetricsSource` port with one bounded GET per fetch.
//! The client-wide timeout covers connect, headers, and body; anything
//! that goes wrong maps onto a `FetchError` variant and is not retried.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::domain::counters::CounterSnapshot;
use crate::ports::metrics_source::{FetchError, MetricsSource};

/// Fetches `CounterSnapshot`s from the roster service's `/metrics`.
pub struct HttpMetricsSource {
    /// Underlying HTTP client.
    http: Client,
    /// Full counters URL.
    url: String,
}

impl HttpMetricsSource {
    /// Create a source for `url` with the given per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<CounterSnapshot, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(FetchError::BodyRead)?;
        let snapshot: CounterSnapshot =
            serde_json::from_slice(&body).map_err(FetchError::Decode)?;

        debug!(
            requests_total = snapshot.requests_total,
            uptime_seconds = snapshot.uptime_seconds,
            "Fetched upstream counters"
        );
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

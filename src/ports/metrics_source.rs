//! Metrics Source Port - Upstream Counter Feed for the Bridge
//!
//! The bridge pulls a `CounterSnapshot` from the roster service on
//! every scrape. Each failure mode is a distinct `FetchError` variant
//! so the scrape response can say what went wrong. Nothing here retries.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::counters::CounterSnapshot;

/// Why a single upstream fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS, or timeout failure before a response arrived.
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    /// Upstream answered with a non-success status.
    #[error("bad status code: {0}")]
    UnexpectedStatus(u16),
    /// Response headers arrived but the body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),
    /// Body is not a counter snapshot.
    #[error("failed to decode counters: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Source of the roster service's counters.
#[async_trait]
pub trait MetricsSource: Send + Sync + 'static {
    /// Fetch the current counters once.
    async fn fetch(&self) -> Result<CounterSnapshot, FetchError>;

    /// Where the counters are fetched from, for logs.
    fn describe(&self) -> String;
}

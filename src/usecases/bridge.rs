//! Metrics Bridge Use Case - Pull-through Counter Republishing
//!
//! Every scrape pulls the roster service's counters once, mirrors them
//! into the gauge pair, and encodes the gauges. The pull happens inside
//! the scrape, never on a timer, so the exposed values are exactly as
//! fresh as the last successful scrape.
//!
//! Failure policy:
//! - fetch errors are returned to the current scrape only
//! - gauges keep their last good values after a failed fetch
//! - no retries; the next scrape is the retry

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::domain::counters::CounterSnapshot;
use crate::ports::exposition::{Exposition, GaugeExporter};
use crate::ports::metrics_source::{FetchError, MetricsSource};

/// Why a scrape could not be answered.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to fetch metrics from target: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to encode metrics: {0:#}")]
    Encode(#[source] anyhow::Error),
}

/// Mirrors upstream counters into exported gauges on demand.
pub struct MetricsBridge {
    /// Upstream counters.
    source: Arc<dyn MetricsSource>,
    /// Gauge sink.
    gauges: Arc<dyn GaugeExporter>,
}

impl MetricsBridge {
    pub fn new(source: Arc<dyn MetricsSource>, gauges: Arc<dyn GaugeExporter>) -> Self {
        Self { source, gauges }
    }

    /// Fetch upstream counters once and, on success, replace the gauges.
    #[instrument(skip(self))]
    pub async fn fetch_and_update(&self) -> Result<CounterSnapshot, FetchError> {
        match self.source.fetch().await {
            Ok(snapshot) => {
                self.gauges.update(&snapshot);
                debug!(
                    requests_total = snapshot.requests_total,
                    uptime_seconds = snapshot.uptime_seconds,
                    "Gauges updated"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!(source = %self.source.describe(), error = %e, "Upstream fetch failed");
                Err(e)
            }
        }
    }

    /// Answer one scrape: fetch, update, encode.
    pub async fn scrape(&self) -> Result<Exposition, BridgeError> {
        self.fetch_and_update().await?;
        self.gauges.encode().map_err(BridgeError::Encode)
    }
}

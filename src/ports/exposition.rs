//! Exposition Port - Gauge Sink for the Metrics Bridge
//!
//! The bridge mirrors upstream counters into a pair of gauges and
//! renders them for scrapers. The exposition library behind this trait
//! is opaque; the only contract is that an update replaces both gauges
//! as one step and an encode never observes half an update.

use crate::domain::counters::CounterSnapshot;

/// Rendered metrics ready to be returned to a scraper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposition {
    /// `Content-Type` header value for the body.
    pub content_type: String,
    /// Encoded metrics text.
    pub body: String,
}

/// Holder of the bridge's mirrored gauges.
pub trait GaugeExporter: Send + Sync + 'static {
    /// Replace both gauges with the values in `snapshot`.
    fn update(&self, snapshot: &CounterSnapshot);

    /// Encode the current gauge values.
    fn encode(&self) -> anyhow::Result<Exposition>;
}

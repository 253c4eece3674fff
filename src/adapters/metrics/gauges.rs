//! Prometheus Gauges - Bridge Exposition Registry
//!
//! Registers the two mirrored gauges in a private Prometheus registry
//! and encodes them in the text exposition format. Updates and encodes
//! serialize on one mutex so a scraper never sees a request total from
//! one fetch next to an uptime from another.

use std::sync::{Mutex, PoisonError};

use prometheus::{Encoder, Gauge, Registry, TextEncoder};

use crate::domain::counters::CounterSnapshot;
use crate::ports::exposition::{Exposition, GaugeExporter};

/// Exported name of the mirrored request total.
pub const REQUESTS_TOTAL_GAUGE: &str = "game_api_requests_total";
/// Exported name of the mirrored uptime.
pub const UPTIME_SECONDS_GAUGE: &str = "game_api_uptime_seconds";

/// Prometheus gauge pair mirroring the roster service's counters.
///
/// Both gauges start at 0 until the first successful fetch.
pub struct CounterGauges {
    /// Private registry (not the process-global default).
    registry: Registry,
    /// Mirror of `requests_total`.
    requests_total: Gauge,
    /// Mirror of `uptime_seconds`.
    uptime_seconds: Gauge,
    /// Makes update and encode mutually exclusive.
    pair: Mutex<()>,
}

impl CounterGauges {
    /// Create and register both gauges.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total =
            Gauge::new(REQUESTS_TOTAL_GAUGE, "Total number of requests to game API")?;
        let uptime_seconds = Gauge::new(UPTIME_SECONDS_GAUGE, "Uptime of game API in seconds")?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            uptime_seconds,
            pair: Mutex::new(()),
        })
    }

    /// Current `(requests_total, uptime_seconds)` gauge values.
    pub fn values(&self) -> (f64, f64) {
        let _guard = self.pair.lock().unwrap_or_else(PoisonError::into_inner);
        (self.requests_total.get(), self.uptime_seconds.get())
    }
}

impl GaugeExporter for CounterGauges {
    fn update(&self, snapshot: &CounterSnapshot) {
        let _guard = self.pair.lock().unwrap_or_else(PoisonError::into_inner);
        // Gauges are f64; totals beyond 2^53 lose precision.
        #[allow(clippy::cast_precision_loss)]
        let requests_total = snapshot.requests_total as f64;
        self.requests_total.set(requests_total);
        self.uptime_seconds.set(snapshot.uptime_seconds);
    }

    fn encode(&self) -> anyhow::Result<Exposition> {
        let families = {
            let _guard = self.pair.lock().unwrap_or_else(PoisonError::into_inner);
            self.registry.gather()
        };

        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;

        Ok(Exposition {
            content_type: encoder.format_type().to_string(),
            body: String::from_utf8(buffer)?,
        })
    }
}

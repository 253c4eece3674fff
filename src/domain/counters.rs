//! Request Counters — Process-wide Runtime Stats
//!
//! Lock-free counters for the roster service. The request total is a
//! single `AtomicU64` bumped on every inbound request; uptime is derived
//! from the instant the counters were created. Nothing here is persisted,
//! so a restart starts over from zero.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Point-in-time view of the service counters.
///
/// This is also the wire format of the service's `/metrics` endpoint,
/// which the metrics bridge decodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Requests received since process start, across all routes.
    pub requests_total: u64,
    /// Seconds since process start.
    pub uptime_seconds: f64,
}

/// Process-wide request counter plus start instant.
#[derive(Debug)]
pub struct RequestCounters {
    requests_total: AtomicU64,
    started_at: Instant,
}

impl RequestCounters {
    /// Start counting from zero, with uptime measured from now.
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Count one inbound request.
    #[inline]
    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current counters.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            uptime_seconds: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for RequestCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_starts_at_zero() {
        let counters = RequestCounters::new();
        assert_eq!(counters.snapshot().requests_total, 0);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counters = Arc::new(RequestCounters::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let counters = Arc::clone(&counters);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        counters.record_request();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(counters.snapshot().requests_total, 16_000);
    }

    #[test]
    fn test_uptime_is_non_decreasing() {
        let counters = RequestCounters::new();
        let first = counters.snapshot().uptime_seconds;
        std::thread::sleep(Duration::from_millis(5));
        let second = counters.snapshot().uptime_seconds;
        assert!(first >= 0.0);
        assert!(second >= first + 0.004, "{second} vs {first}");
    }

    #[test]
    fn test_snapshot_wire_format() {
        let snap = CounterSnapshot {
            requests_total: 7,
            uptime_seconds: 12.5,
        };
        let json = serde_json::to_value(snap).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"requests_total": 7, "uptime_seconds": 12.5})
        );
    }
}

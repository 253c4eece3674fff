//! Metrics Bridge Adapters
//!
//! Everything the bridge process touches outside its use case:
//! the reqwest client polling the roster's counters, the Prometheus
//! gauge registry, and the axum `/metrics` server.

pub mod gauges;
pub mod server;
pub mod source;

pub use gauges::CounterGauges;
pub use server::{BridgeServer, bridge_router};
pub use source::HttpMetricsSource;

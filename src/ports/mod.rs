//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `KeyValueStore`: character persistence (set / get / keys by prefix)
//! - `MetricsSource`: upstream counters polled by the metrics bridge
//! - `GaugeExporter`: gauge sink the bridge publishes into

pub mod exposition;
pub mod metrics_source;
pub mod store;

pub use exposition::{Exposition, GaugeExporter};
pub use metrics_source::{FetchError, MetricsSource};
pub use store::KeyValueStore;

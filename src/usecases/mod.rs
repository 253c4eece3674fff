//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the two services' workflows.
//!
//! Use cases:
//! - `CharacterService`: character create / list over the store
//! - `MetricsBridge`: fetch upstream counters per scrape, republish as gauges

pub mod bridge;
pub mod roster;

pub use bridge::{BridgeError, MetricsBridge};
pub use roster::{CharacterService, ServiceError};

//! Domain layer - Core roster types and runtime counters.
//!
//! No I/O here (hexagonal architecture inner ring). Everything is
//! serializable and testable in isolation.

pub mod character;
pub mod counters;

pub use character::{CHARACTER_NAMESPACE, Character, CharacterKey, KeyMinter};
pub use counters::{CounterSnapshot, RequestCounters};

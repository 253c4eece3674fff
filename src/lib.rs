//! Game Roster — Library Root
//!
//! Shared by the `game-api` and `metrics-bridge` binaries, integration
//! tests, and benchmarks.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;

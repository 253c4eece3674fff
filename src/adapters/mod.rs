//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (Redis, HTTP clients and servers, Prometheus).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `http`: roster API router, handlers, request-counting middleware
//! - `metrics`: bridge upstream client, Prometheus gauges, bridge server
//! - `persistence`: Redis and in-memory key-value stores

pub mod http;
pub mod metrics;
pub mod persistence;

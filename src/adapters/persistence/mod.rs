//! Persistence Adapters - Key-Value Store Backends
//!
//! Implements the `KeyValueStore` port twice: Redis for production,
//! a `HashMap` for tests and store-less local runs. `open_store` picks
//! one from configuration.

pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::ports::store::KeyValueStore;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Build the configured store backend.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StoreBackend::Redis => {
            info!(addr = %config.redis_addr, "Using Redis store");
            Ok(Arc::new(RedisStore::new(&config.redis_addr)?))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

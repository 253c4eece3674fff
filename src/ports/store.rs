//! Key-Value Store Port - Character Persistence Interface
//!
//! The roster treats its backing store as an opaque capability:
//! write bytes under a key, read them back, enumerate keys by prefix.
//! No ordering, expiry, or multi-key transactions are assumed.

use async_trait::async_trait;

/// Minimal key-value capability the roster is written against.
///
/// Implemented by the Redis adapter for production and by an
/// in-memory adapter for tests and local runs.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Store `value` under `key` with no expiration, replacing any old value.
    async fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()>;

    /// Fetch the value under `key`, `None` if the key does not exist.
    async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// Enumerate every key starting with `prefix`, in no particular order.
    async fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>>;

    /// Check that the store is reachable.
    async fn ping(&self) -> anyhow::Result<()>;
}

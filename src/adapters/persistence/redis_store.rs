//! Redis Store - Production Key-Value Adapter
//!
//! Implements the `KeyValueStore` port over a multiplexed async Redis
//! connection. The connection is opened lazily on first use and dropped
//! after an I/O failure so the next call reconnects; the service can
//! therefore boot while Redis is still coming up.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::ports::store::KeyValueStore;

/// Redis-backed key-value store.
pub struct RedisStore {
    /// Redis client (holds the parsed address, no socket).
    client: redis::Client,
    /// Cached connection, `None` until first use or after a failure.
    conn: Mutex<Option<MultiplexedConnection>>,
    /// `host:port` for logs.
    addr: String,
}

impl RedisStore {
    /// Create a store for `host:port`. Does not connect yet.
    pub fn new(addr: &str) -> Result<Self> {
        let client = redis::Client::open(format!("redis://{addr}/"))
            .with_context(|| format!("Invalid Redis address: {addr}"))?;
        Ok(Self {
            client,
            conn: Mutex::new(None),
            addr: addr.to_string(),
        })
    }

    /// Get the cached connection or open a new one.
    async fn connection(&self) -> Result<MultiplexedConnection> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }
        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .with_context(|| format!("Failed to connect to Redis at {}", self.addr))?;
        debug!(addr = %self.addr, "Redis connection established");
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Forget the cached connection if `err` means the socket is gone.
    async fn on_error(&self, err: &redis::RedisError) {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            warn!(addr = %self.addr, error = %err, "Dropping Redis connection");
            self.conn.lock().await.take();
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.connection().await?;
        let result: redis::RedisResult<()> = conn.set(key, value).await;
        if let Err(e) = &result {
            self.on_error(e).await;
        }
        result.with_context(|| format!("SET {key} failed"))
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        let result: redis::RedisResult<Option<Vec<u8>>> = conn.get(key).await;
        if let Err(e) = &result {
            self.on_error(e).await;
        }
        result.with_context(|| format!("GET {key} failed"))
    }

    #[instrument(skip(self))]
    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let pattern = format!("{}*", escape_glob(prefix));
        let mut conn = self.connection().await?;
        let result: redis::RedisResult<Vec<String>> = conn.keys(&pattern).await;
        if let Err(e) = &result {
            self.on_error(e).await;
        }
        result.with_context(|| format!("KEYS {pattern} failed"))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let result: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        if let Err(e) = &result {
            self.on_error(e).await;
        }
        result.map(|_| ()).context("PING failed")
    }
}

/// Escape Redis glob metacharacters so a prefix matches literally.
fn escape_glob(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_glob_leaves_namespace_alone() {
        assert_eq!(escape_glob("char:"), "char:");
    }

    #[test]
    fn test_escape_glob_escapes_metacharacters() {
        assert_eq!(escape_glob("a*b?[c]\\"), "a\\*b\\?\\[c\\]\\\\");
    }

    #[test]
    fn test_new_does_not_connect() {
        // Nothing listens here; construction must still succeed.
        assert!(RedisStore::new("127.0.0.1:1").is_ok());
    }
}

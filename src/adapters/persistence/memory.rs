//! In-Memory Store - Process-local Key-Value Adapter
//!
//! `HashMap`-backed implementation of the `KeyValueStore` port for
//! tests, benchmarks, and running the API without Redis. Key
//! enumeration follows hash order, so callers get no ordering either.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::store::KeyValueStore;

/// Key-value store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys (any namespace).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", b"one").await.unwrap();
        store.set("k", b"two").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_keys_filters_by_prefix() {
        let store = MemoryStore::new();
        store.set("char:1", b"a").await.unwrap();
        store.set("char:2", b"b").await.unwrap();
        store.set("session:1", b"c").await.unwrap();

        let mut keys = store.keys("char:").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["char:1".to_string(), "char:2".to_string()]);
    }
}

//! Process-local audio store.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use voxcache_core::{AudioStore, StoreError};

/// In-memory [`AudioStore`] backed by a `HashMap`.
///
/// Values are [`Bytes`], so `get` hands out a reference-counted view rather
/// than copying the clip. Entries live until the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryAudioStore {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl MemoryAudioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Snapshot of all keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl AudioStore for MemoryAudioStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        tracing::trace!(key, bytes = value.len(), "memory store set");
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}

//! Store construction from settings.

use std::sync::Arc;

use voxcache_core::{AudioStore, CacheSettings, StoreBackend, StoreError};

use crate::memory::MemoryAudioStore;

/// Build the store selected by `settings`.
///
/// Absence of a required store configuration is a construction-time error:
/// the cache layer never starts in a half-configured state.
pub async fn connect_store(settings: &CacheSettings) -> Result<Arc<dyn AudioStore>, StoreError> {
    match settings.store {
        StoreBackend::Memory => {
            tracing::debug!("Using in-memory audio store");
            Ok(Arc::new(MemoryAudioStore::new()))
        }
        StoreBackend::Redis => {
            let url = settings.redis_url.as_deref().ok_or_else(|| {
                StoreError::NotConfigured("redis store selected but REDIS_URL is not set".into())
            })?;
            connect_redis(url).await
        }
    }
}

#[cfg(feature = "redis")]
async fn connect_redis(url: &str) -> Result<Arc<dyn AudioStore>, StoreError> {
    let store = crate::redis_store::RedisAudioStore::connect(url).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(_url: &str) -> Result<Arc<dyn AudioStore>, StoreError> {
    Err(StoreError::NotConfigured(
        "voxcache-store was built without the `redis` feature".into(),
    ))
}

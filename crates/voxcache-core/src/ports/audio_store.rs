//! Audio store trait definition.
//!
//! This port defines the byte-valued key-value store the cache layer reads
//! from and writes to. Implementations handle connection management and
//! expiry (if any) internally.

use async_trait::async_trait;
use bytes::Bytes;

use super::StoreError;

/// Byte store for cached audio.
///
/// Implementations must be safe to call concurrently from independent
/// requests; the cache layer holds no lock around them.
///
/// # Design Rules
///
/// - Keys are opaque strings produced by the cache key codec
/// - Values are the raw, undecorated audio of one complete synthesis
/// - A `set` overwrites unconditionally (two writers settle to one value)
#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Check whether an entry exists for `key`.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Fetch the entry for `key`.
    ///
    /// Returns `Ok(None)` if the entry vanished (expired or evicted by the
    /// store) between an `exists` check and this call.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Store `value` under `key`.
    async fn set(&self, key: &str, value: Bytes) -> Result<(), StoreError>;

    /// Short backend identifier for logs (e.g. `"memory"`, `"redis"`).
    fn backend_type(&self) -> &'static str;
}

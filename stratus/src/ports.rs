use async_trait::async_trait;
use bytes::Bytes;
use shared::{Result, TtlMs};
use std::sync::Arc;

// Ports are the pluggable extension points for underlying storage implementations

/// Port for the key-value store backing the cache gateway.
///
/// Implementations enforce expiry themselves: an entry past its TTL must
/// behave as absent on `get`. Both operations must be safe to call
/// concurrently without external locking.
#[async_trait]
pub trait CacheStore<K, V>: Send + Sync + 'static {
    async fn get(&self, key: &K) -> Result<Option<V>>;
    async fn set(&self, key: K, val: V, ttl: TtlMs) -> Result<()>;
}

/// Store holding serialized payloads keyed by cache key.
pub type SharedCacheStore = Arc<dyn CacheStore<String, Bytes>>;

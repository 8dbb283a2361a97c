use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use shared::{Result, TtlMs};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};
use stratus::domain::CacheEntry;
use stratus::ports::CacheStore;

/// Expires every entry according to the TTL it was written with.
struct PerEntryTtl;

impl<K, V> Expiry<K, CacheEntry<K, V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &K,
        entry: &CacheEntry<K, V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl_duration())
    }

    // A rewrite restarts the clock with the new entry's TTL.
    fn expire_after_update(
        &self,
        _key: &K,
        entry: &CacheEntry<K, V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl_duration())
    }
}

/// Moka-based cache implementation with per-entry TTL support
/// Provides lock-free, concurrent cache with optional size bounds
pub struct MokaCache<K, V>
where
    K: Debug + Hash + Eq + Clone + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    cache: Cache<K, CacheEntry<K, V>>,
}

impl<K, V> MokaCache<K, V>
where
    K: Debug + Hash + Eq + Clone + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    /// Create a new unbounded Moka cache
    pub fn new_unbounded() -> Self {
        Self {
            cache: Cache::builder().expire_after(PerEntryTtl).build(),
        }
    }

    /// Create a Moka cache from name and optional capacity
    pub fn new(name: &str, max_entries: Option<u64>) -> Self {
        let mut builder = Cache::builder().name(name).expire_after(PerEntryTtl);

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<K, V> CacheStore<K, V> for MokaCache<K, V>
where
    K: Debug + Hash + Eq + Clone + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        // Expired entries are already invisible to moka's get
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: K, val: V, ttl: TtlMs) -> Result<()> {
        let entry = CacheEntry::new(key.clone(), val, ttl);
        self.cache.insert(key, entry).await;
        tracing::trace!(ttl_ms = ttl.0, "Inserted cache entry");
        Ok(())
    }
}

impl<K, V> Debug for MokaCache<K, V>
where
    K: Debug + Hash + Eq + Clone + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}

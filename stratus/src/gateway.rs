//! Get-or-compute access to the shared cache store.
//!
//! A hit returns the stored value at once and schedules a detached task that
//! re-stores the same bytes under the same TTL, extending the entry's
//! freshness without contacting upstream. A miss runs the caller's fetch,
//! writes the result and only then returns it, so the next caller for the
//! same key sees a hit.
//!
//! Concurrent misses on one key are not de-duplicated: each caller runs its
//! own fetch and the last write wins.

use crate::ports::SharedCacheStore;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{Error, TtlMs};
use std::fmt::{self, Display};
use std::future::Future;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct CacheGateway {
    store: SharedCacheStore,
}

impl CacheGateway {
    pub fn new(store: SharedCacheStore) -> Self {
        Self { store }
    }

    /// Resolve `key` against the store, falling back to `fetch` on a miss.
    ///
    /// Errors from `fetch` are returned unchanged and nothing is written.
    /// Store failures on the request path are converted through
    /// `E: From<Error>`; failures of the background refresh are only logged.
    pub async fn resolve<T, E, F, Fut>(&self, key: &str, ttl: TtlMs, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<Error> + Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cached = self.store.get(&key.to_string()).await.map_err(|e| {
            warn!(key, error = %e, "Cache read failed");
            E::from(e)
        })?;

        if let Some(bytes) = cached {
            match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    info!(key, "Cache hit, returning cached data");
                    self.spawn_refresh(key.to_string(), bytes, ttl);
                    return Ok(value);
                }
                Err(e) => {
                    warn!(key, error = %e, "Discarding cache entry that no longer decodes");
                }
            }
        }

        info!(key, "Cache miss, fetching fresh data");
        let value = fetch().await.map_err(|e| {
            warn!(key, error = %e, "Fetch failed on cache miss");
            e
        })?;

        let bytes = serde_json::to_vec(&value)
            .map_err(|e| E::from(Error::Serialization(e.to_string())))?;
        self.store
            .set(key.to_string(), Bytes::from(bytes), ttl)
            .await
            .map_err(|e| {
                warn!(key, error = %e, "Cache write failed");
                E::from(e)
            })?;
        info!(key, ttl_secs = ttl.as_secs(), "Stored fresh data");

        Ok(value)
    }

    fn spawn_refresh(&self, key: String, bytes: Bytes, ttl: TtlMs) {
        let store = self.store.clone();
        tokio::spawn(async move {
            match store.set(key.clone(), bytes, ttl).await {
                Ok(()) => debug!(key, ttl_secs = ttl.as_secs(), "Refreshed cache entry"),
                Err(e) => warn!(key, error = %e, "Cache refresh failed"),
            }
        });
    }
}

impl fmt::Debug for CacheGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheGateway")
            .field("store", &"<dyn CacheStore>")
            .finish()
    }
}

use serde::{Deserialize, Serialize};
use shared::TtlMs;
use std::fmt;
use std::time::{Duration, Instant};

/// A value held by a cache store together with its freshness window.
#[derive(Clone, Debug)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub value: V,
    pub stored_at: Instant,
    pub ttl: TtlMs,
}

impl<K, V> CacheEntry<K, V> {
    pub fn new(key: K, value: V, ttl: TtlMs) -> Self {
        Self {
            key,
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    pub fn ttl_duration(&self) -> Duration {
        self.ttl.into()
    }

    /// True once `now - stored_at` exceeds the TTL.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl_duration()
    }
}

/// Logical resources served by the upstream weather provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    CurrentWeather,
    Forecast,
}

impl ResourceKind {
    const CURRENT_WEATHER_TTL: TtlMs = TtlMs(300_000);
    const FORECAST_TTL: TtlMs = TtlMs(1_800_000);

    /// Name used both as the cache key prefix and the upstream path segment.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::CurrentWeather => "weather",
            ResourceKind::Forecast => "forecast",
        }
    }

    /// Forecasts change more slowly upstream, so they live longer.
    pub fn ttl(&self) -> TtlMs {
        match self {
            ResourceKind::CurrentWeather => Self::CURRENT_WEATHER_TTL,
            ResourceKind::Forecast => Self::FORECAST_TTL,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to fetch if the cache misses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: ResourceKind,
    pub city: String,
}

impl FetchRequest {
    pub fn new(kind: ResourceKind, city: impl Into<String>) -> Self {
        Self {
            kind,
            city: city.into(),
        }
    }

    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.kind.name(), self.city)
    }

    pub fn ttl(&self) -> TtlMs {
        self.kind.ttl()
    }
}

pub mod moka_cache;

pub use moka_cache::MokaCache;

use bytes::Bytes;

/// Store for serialized upstream payloads keyed by cache key.
pub type PayloadCache = MokaCache<String, Bytes>;

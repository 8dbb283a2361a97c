//! Weather proxy core: the cache gateway, the upstream fetch orchestrator
//! and location management.

pub mod domain;
pub mod gateway;
pub mod locations;
pub mod ports;
pub mod weather;

pub use gateway::CacheGateway;
pub use ports::{CacheStore, SharedCacheStore};

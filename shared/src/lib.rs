// shared/src/lib.rs
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Time-to-live in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TtlMs(pub u64);

impl TtlMs {
    pub fn as_secs(&self) -> u64 {
        self.0 / 1000
    }
}

impl From<TtlMs> for Duration {
    fn from(ttl: TtlMs) -> Self {
        Duration::from_millis(ttl.0)
    }
}

impl From<Duration> for TtlMs {
    fn from(duration: Duration) -> Self {
        TtlMs(duration.as_millis() as u64)
    }
}

pub mod config;

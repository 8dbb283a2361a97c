mod error;
pub mod models;
mod service;

pub use error::{FetchFailure, UpstreamError, classify_failure};
pub use models::{WeatherForecastResponse, WeatherResponse};
pub use service::{WeatherService, cache_key_for, ttl_for};

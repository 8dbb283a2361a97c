use crate::graphql::{self, StratusSchema};
use crate::middleware::RateLimiter;
use std::sync::Arc;
use stratus::locations::LocationService;
use stratus::weather::WeatherService;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<WeatherService>,
    pub locations: Arc<LocationService>,
    pub schema: StratusSchema,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        weather: Arc<WeatherService>,
        locations: Arc<LocationService>,
        rate_limiter: RateLimiter,
    ) -> Self {
        let schema = graphql::create_schema(weather.clone(), locations.clone());

        Self {
            weather,
            locations,
            schema,
            rate_limiter,
        }
    }
}

use super::error::{FetchFailure, UpstreamError, classify_failure};
use super::models::{WeatherForecastResponse, WeatherResponse};
use crate::domain::{FetchRequest, ResourceKind};
use crate::gateway::CacheGateway;
use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::config::WeatherConfig;
use shared::{Error, TtlMs};
use std::fmt;
use tracing::{debug, warn};

/// Cache key for a resource, `<kind>:<city>`.
pub fn cache_key_for(kind: ResourceKind, city: &str) -> String {
    FetchRequest::new(kind, city).cache_key()
}

pub fn ttl_for(kind: ResourceKind) -> TtlMs {
    kind.ttl()
}

/// Fetches weather resources through the cache gateway.
pub struct WeatherService {
    client: Client,
    base_url: Url,
    api_key: String,
    units: String,
    gateway: CacheGateway,
}

impl WeatherService {
    pub fn new(config: &WeatherConfig, gateway: CacheGateway) -> shared::Result<Self> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| Error::Config(format!("invalid weather API url '{}': {}", config.api_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "weather API url '{}' cannot carry a path",
                config.api_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            units: config.units.clone(),
            gateway,
        })
    }

    pub async fn get_current_weather(&self, city: &str) -> Result<WeatherResponse, UpstreamError> {
        self.fetch_resource(ResourceKind::CurrentWeather, city).await
    }

    pub async fn get_forecast(&self, city: &str) -> Result<WeatherForecastResponse, UpstreamError> {
        self.fetch_resource(ResourceKind::Forecast, city).await
    }

    /// Resolve one resource through the cache, fetching upstream on a miss.
    pub async fn fetch_resource<T>(&self, kind: ResourceKind, city: &str) -> Result<T, UpstreamError>
    where
        T: Serialize + DeserializeOwned,
    {
        let request = FetchRequest::new(kind, city);
        self.gateway
            .resolve(&request.cache_key(), request.ttl(), || self.fetch_from_api(&request))
            .await
    }

    /// `<api_url>/<kind>?q=<city>&appid=<key>&units=<units>`
    pub fn build_request(&self, kind: ResourceKind, city: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(kind.name());
        }
        url.query_pairs_mut()
            .append_pair("q", city)
            .append_pair("appid", &self.api_key)
            .append_pair("units", &self.units);
        url
    }

    async fn fetch_from_api<T>(&self, request: &FetchRequest) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
    {
        let url = self.build_request(request.kind, &request.city);
        debug!(kind = %request.kind, city = %request.city, "Requesting upstream");

        let response = self.client.get(url).send().await.map_err(|e| {
            let failure = FetchFailure::Transport {
                message: e.without_url().to_string(),
            };
            warn!(kind = %request.kind, city = %request.city, ?failure, "Upstream unreachable");
            classify_failure(failure)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let failure = FetchFailure::Response {
                status: status.as_u16(),
                message,
            };
            warn!(kind = %request.kind, city = %request.city, ?failure, "Upstream returned an error");
            return Err(classify_failure(failure));
        }

        response.json::<T>().await.map_err(|e| {
            let failure = FetchFailure::Response {
                status: status.as_u16(),
                message: format!("invalid payload: {}", e.without_url()),
            };
            warn!(kind = %request.kind, city = %request.city, ?failure, "Upstream payload rejected");
            classify_failure(failure)
        })
    }
}

impl fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherService")
            .field("base_url", &self.base_url.as_str())
            .field("units", &self.units)
            .finish()
    }
}

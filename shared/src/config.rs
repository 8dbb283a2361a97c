use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Settings for the upstream weather provider.
#[derive(Clone)]
pub struct WeatherConfig {
    pub api_url: String,
    pub api_key: String,
    pub units: String,
    pub timeout: Duration,
}

/// Sliding-window rate limit applied to every inbound request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThrottleConfig {
    pub window: Duration,
    pub limit: u32,
    /// Key clients on the first `X-Forwarded-For` hop instead of the peer
    /// address. Only safe behind a proxy that overwrites the header.
    pub trust_proxy: bool,
}

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub allowed_origins: Vec<String>,
    pub cache_max_entries: u64,
    pub weather: WeatherConfig,
    pub throttle: ThrottleConfig,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 3000;
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;
    const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5";
    const DEFAULT_WEATHER_UNITS: &str = "metric";
    const DEFAULT_WEATHER_TIMEOUT_MS: u64 = 5_000;
    const DEFAULT_THROTTLE_TTL_MS: u64 = 3_600_000;
    const DEFAULT_THROTTLE_LIMIT: u32 = 10;

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let api_key = lookup("WEATHER_API_KEY").unwrap_or_else(|| {
            warn!("WEATHER_API_KEY not set, upstream requests will be rejected by the provider");
            String::new()
        });

        Self {
            host: var_or("STRATUS_HOST", Self::DEFAULT_HOST),
            http_port: parse_or(&lookup, "STRATUS_HTTP_PORT", Self::DEFAULT_HTTP_PORT),
            data_dir: var_or("STRATUS_DATA_DIR", Self::DEFAULT_DATA_DIR),
            allowed_origins: var_or("STRATUS_ALLOWED_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            cache_max_entries: parse_or(
                &lookup,
                "STRATUS_CACHE_MAX_ENTRIES",
                Self::DEFAULT_CACHE_MAX_ENTRIES,
            ),
            weather: WeatherConfig {
                api_url: var_or("WEATHER_API_URL", Self::DEFAULT_WEATHER_API_URL),
                api_key,
                units: var_or("WEATHER_UNITS", Self::DEFAULT_WEATHER_UNITS),
                timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "WEATHER_TIMEOUT_MS",
                    Self::DEFAULT_WEATHER_TIMEOUT_MS,
                )),
            },
            throttle: ThrottleConfig {
                window: Duration::from_millis(parse_or(
                    &lookup,
                    "THROTTLE_TTL",
                    Self::DEFAULT_THROTTLE_TTL_MS,
                )),
                limit: parse_or(&lookup, "THROTTLE_LIMIT", Self::DEFAULT_THROTTLE_LIMIT),
                trust_proxy: parse_or(&lookup, "THROTTLE_TRUST_PROXY", false),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using the default", name, raw);
            default
        }),
        None => default,
    }
}

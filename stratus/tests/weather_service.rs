//! Integration tests for WeatherService against a mock provider.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use shared::TtlMs;
use shared::config::WeatherConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stratus::domain::ResourceKind;
use stratus::weather::{UpstreamError, WeatherService, cache_key_for, ttl_for};
use stratus::{CacheGateway, CacheStore};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingStore {
    entries: Mutex<HashMap<String, (Bytes, TtlMs)>>,
}

impl RecordingStore {
    fn ttl_of(&self, key: &str) -> Option<TtlMs> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }
}

#[async_trait]
impl CacheStore<String, Bytes> for RecordingStore {
    async fn get(&self, key: &String) -> shared::Result<Option<Bytes>> {
        Ok(self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone()))
    }

    async fn set(&self, key: String, val: Bytes, ttl: TtlMs) -> shared::Result<()> {
        self.entries.lock().unwrap().insert(key, (val, ttl));
        Ok(())
    }
}

fn config(api_url: &str) -> WeatherConfig {
    WeatherConfig {
        api_url: api_url.to_string(),
        api_key: "test-key".to_string(),
        units: "metric".to_string(),
        timeout: Duration::from_secs(2),
    }
}

fn service(api_url: &str) -> (Arc<RecordingStore>, WeatherService) {
    let store = Arc::new(RecordingStore::default());
    let gateway = CacheGateway::new(store.clone());
    let service = WeatherService::new(&config(api_url), gateway).unwrap();
    (store, service)
}

fn tokyo_weather() -> serde_json::Value {
    json!({
        "coord": { "lon": 139.0, "lat": 35.0 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "base": "stations",
        "main": {
            "temp": 25.5, "feels_like": 26.2, "temp_min": 24.8, "temp_max": 26.3,
            "pressure": 1012, "humidity": 65, "sea_level": 1012, "grnd_level": 1008
        },
        "visibility": 10000,
        "wind": { "speed": 5.5, "deg": 180 },
        "clouds": { "all": 0 },
        "dt": 1618317040,
        "sys": { "type": 1, "id": 8074, "country": "JP", "sunrise": 1618282134, "sunset": 1618333901 },
        "timezone": 32400,
        "id": 1851632,
        "name": "Tokyo",
        "cod": 200
    })
}

fn tokyo_forecast() -> serde_json::Value {
    json!({
        "cod": "200",
        "message": 0,
        "cnt": 1,
        "list": [{
            "dt": 1618317040,
            "main": {
                "temp": 25.5, "feels_like": 26.2, "temp_min": 24.8, "temp_max": 26.3,
                "pressure": 1012, "humidity": 65, "sea_level": 1012, "grnd_level": 1008
            },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "clouds": { "all": 0 },
            "wind": { "speed": 5.5, "deg": 180 },
            "dt_txt": "2021-04-13 00:00:00"
        }],
        "city": {
            "id": 1851632, "name": "Tokyo", "country": "JP", "population": 0,
            "timezone": 32400, "sunrise": 1618282134, "sunset": 1618333901
        }
    })
}

#[test]
fn test_cache_keys_and_ttls() {
    assert_eq!(cache_key_for(ResourceKind::CurrentWeather, "Tokyo"), "weather:Tokyo");
    assert_eq!(cache_key_for(ResourceKind::Forecast, "Tokyo"), "forecast:Tokyo");
    assert_eq!(ttl_for(ResourceKind::CurrentWeather), TtlMs(300_000));
    assert_eq!(ttl_for(ResourceKind::Forecast), TtlMs(1_800_000));
}

#[tokio::test]
async fn test_build_request_interpolates_all_parameters() {
    let (_store, service) = service("https://api.openweathermap.org/data/2.5");

    let url = service.build_request(ResourceKind::CurrentWeather, "Tokyo");
    assert_eq!(
        url.as_str(),
        "https://api.openweathermap.org/data/2.5/weather?q=Tokyo&appid=test-key&units=metric"
    );

    let url = service.build_request(ResourceKind::Forecast, "San Francisco");
    assert_eq!(url.path(), "/data/2.5/forecast");
    let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs["q"], "San Francisco");
}

#[tokio::test]
async fn test_build_request_tolerates_trailing_slash() {
    let (_store, service) = service("https://api.example.test/data/2.5/");
    let url = service.build_request(ResourceKind::CurrentWeather, "Oslo");
    assert_eq!(url.path(), "/data/2.5/weather");
}

#[tokio::test]
async fn test_invalid_api_url_is_rejected() {
    let store = Arc::new(RecordingStore::default());
    let result = WeatherService::new(&config("not a url"), CacheGateway::new(store));
    assert!(matches!(result, Err(shared::Error::Config(_))));
}

#[tokio::test]
async fn test_current_weather_fetched_once_then_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Tokyo"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokyo_weather()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (store, service) = service(&mock_server.uri());

    let first = service.get_current_weather("Tokyo").await.unwrap();
    assert_eq!(first.name, "Tokyo");
    assert_eq!(first.main.temp, 25.5);
    assert_eq!(store.ttl_of("weather:Tokyo"), Some(TtlMs(300_000)));

    let second = service.get_current_weather("Tokyo").await.unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_forecast_uses_its_own_key_and_ttl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokyo_forecast()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (store, service) = service(&mock_server.uri());

    let forecast = service.get_forecast("Tokyo").await.unwrap();
    assert_eq!(forecast.cnt, 1);
    assert_eq!(forecast.list[0].dt_txt, "2021-04-13 00:00:00");
    assert_eq!(forecast.city.name, "Tokyo");
    assert_eq!(store.ttl_of("forecast:Tokyo"), Some(TtlMs(1_800_000)));
    assert_eq!(store.ttl_of("weather:Tokyo"), None);
}

#[tokio::test]
async fn test_unknown_city_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Nowhereland"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "cod": "404",
            "message": "city not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (store, service) = service(&mock_server.uri());

    let err = service.get_current_weather("Nowhereland").await.unwrap_err();
    assert!(matches!(err, UpstreamError::NotFound { status: Some(404), .. }));
    assert!(err.message().contains("city not found"));
    assert_eq!(store.ttl_of("weather:Nowhereland"), None);
}

#[tokio::test]
async fn test_upstream_server_error_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (_store, service) = service(&mock_server.uri());

    let err = service.get_forecast("Tokyo").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unavailable { status: Some(500), .. }));
}

#[tokio::test]
async fn test_malformed_payload_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&mock_server)
        .await;

    let (_store, service) = service(&mock_server.uri());

    let err = service.get_current_weather("Tokyo").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unavailable { status: Some(200), .. }));
}

#[tokio::test]
async fn test_connection_refused_is_unknown() {
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let (_store, service) = service(&uri);

    let err = service.get_current_weather("Tokyo").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unknown { status: None, .. }));
    assert!(!err.message().contains("test-key"));
}

#[tokio::test]
async fn test_slow_upstream_times_out_as_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(tokyo_weather())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let store = Arc::new(RecordingStore::default());
    let mut config = config(&mock_server.uri());
    config.timeout = Duration::from_millis(200);
    let service = WeatherService::new(&config, CacheGateway::new(store)).unwrap();

    let err = service.get_current_weather("Tokyo").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unknown { .. }));
}

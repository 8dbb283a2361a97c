use axum::ServiceExt;
use server_http::{build_app, AppState, RateLimiter};
use shared::config::Config;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use storage_engine::PayloadCache;
use stratus::locations::{LocationService, SledLocationRepository};
use stratus::weather::WeatherService;
use stratus::CacheGateway;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Stratus HTTP Server...");

    // Load environment variables from .env file (if exists)
    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();

    // Cached upstream payloads
    let store = Arc::new(PayloadCache::new("weather", Some(config.cache_max_entries)));
    let gateway = CacheGateway::new(store);
    let weather = Arc::new(WeatherService::new(&config.weather, gateway)?);
    info!(api_url = %config.weather.api_url, units = %config.weather.units, "Weather service ready");

    // Saved locations
    std::fs::create_dir_all(&config.data_dir)?;
    let locations_path = Path::new(&config.data_dir).join("locations.sled");
    let repo = Arc::new(SledLocationRepository::new(&locations_path)?);
    let locations = Arc::new(LocationService::new(repo));
    info!(path = %locations_path.display(), "Location store opened");

    let rate_limiter = RateLimiter::from_config(&config.throttle);
    let state = AppState::new(weather, locations, rate_limiter);
    let app = build_app(state, &config.allowed_origins);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("HTTP Server listening on http://{}", address);
    info!("Try: curl http://localhost:{}/weather/London", config.http_port);

    // Graceful shutdown handler
    axum::serve(
        listener,
        ServiceExt::<axum::extract::Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}

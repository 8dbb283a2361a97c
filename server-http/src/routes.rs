use crate::graphql;
use crate::handlers;
use crate::middleware::rate_limit_middleware;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::Layer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Build and configure the application router
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Weather routes
        .route("/weather/{city}", get(handlers::get_current_weather))
        .route("/weather/forecast/{city}", get(handlers::get_forecast))
        // Location routes
        .route("/locations", post(handlers::add_location))
        .route("/locations", get(handlers::list_locations))
        .route("/locations/{id}", delete(handlers::remove_location))
        // GraphQL
        .route(
            "/graphql",
            post(graphql::graphql_handler).get(graphql::graphiql_handler),
        )
        // Middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router wrapped so `/locations/` and `/locations` match the same route.
/// Path normalisation has to run before routing, so it wraps the router
/// instead of being added as a layer.
pub fn build_app(state: AppState, allowed_origins: &[String]) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

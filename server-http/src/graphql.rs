//! GraphQL endpoint over the weather and location services.
//!
//! - POST /graphql executes queries and mutations
//! - GET /graphql serves the GraphiQL playground

use async_graphql::{
    Context, EmptySubscription, Error as GqlError, ErrorExtensions, Object, Result as GqlResult,
    Schema,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use std::sync::Arc;
use stratus::locations::{Location, LocationError, LocationService};
use stratus::weather::{UpstreamError, WeatherForecastResponse, WeatherResponse, WeatherService};
use tracing::warn;

use crate::state::AppState;

const FORECAST_FAILURE: &str = "Unable to fetch weather forecast. Please try again.";

pub type StratusSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

fn with_status(message: impl Into<String>, status: u16) -> GqlError {
    GqlError::new(message).extend_with(|_, ext| ext.set("status", i32::from(status)))
}

fn upstream_error(err: &UpstreamError) -> GqlError {
    let status = match err {
        UpstreamError::NotFound { .. } => 404,
        UpstreamError::Unavailable { .. } | UpstreamError::Unknown { .. } => 503,
    };
    with_status(err.user_message(), status)
}

fn location_error(err: &LocationError) -> GqlError {
    match err {
        LocationError::InvalidCity => with_status(err.to_string(), 400),
        LocationError::NotFound(_) => with_status(err.to_string(), 404),
        LocationError::StorageError(_) | LocationError::SerializationError(_) => {
            warn!(error = %err, "Location storage failure");
            with_status("Internal server error", 500)
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn get_current_weather(
        &self,
        ctx: &Context<'_>,
        city: String,
    ) -> GqlResult<WeatherResponse> {
        let weather = ctx.data::<Arc<WeatherService>>()?;
        weather
            .get_current_weather(&city)
            .await
            .map_err(|e| upstream_error(&e))
    }

    /// Any failure is reported with a single generic message.
    async fn get_forecast(
        &self,
        ctx: &Context<'_>,
        city: String,
    ) -> GqlResult<WeatherForecastResponse> {
        let weather = ctx.data::<Arc<WeatherService>>()?;
        weather.get_forecast(&city).await.map_err(|e| {
            warn!(%city, error = %e, "Forecast query failed");
            with_status(FORECAST_FAILURE, 503)
        })
    }

    async fn locations(&self, ctx: &Context<'_>) -> GqlResult<Vec<Location>> {
        let locations = ctx.data::<Arc<LocationService>>()?;
        locations
            .list_locations()
            .await
            .map_err(|e| location_error(&e))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn add_location(
        &self,
        ctx: &Context<'_>,
        city: String,
        country: Option<String>,
    ) -> GqlResult<Location> {
        let locations = ctx.data::<Arc<LocationService>>()?;
        locations
            .add_location(&city, country)
            .await
            .map_err(|e| location_error(&e))
    }

    async fn remove_location(&self, ctx: &Context<'_>, id: i64) -> GqlResult<bool> {
        let locations = ctx.data::<Arc<LocationService>>()?;
        locations
            .remove_location(id)
            .await
            .map_err(|e| location_error(&e))?;
        Ok(true)
    }
}

pub fn create_schema(weather: Arc<WeatherService>, locations: Arc<LocationService>) -> StratusSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(weather)
        .data(locations)
        .finish()
}

/// POST /graphql
pub async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// GET /graphql
pub async fn graphiql_handler() -> impl IntoResponse {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

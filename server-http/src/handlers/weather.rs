use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use stratus::weather::{WeatherForecastResponse, WeatherResponse};
use tracing::info;

/// GET /weather/{city}
pub async fn get_current_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherResponse>, ApiError> {
    info!(%city, "GET current weather");

    let weather = state.weather.get_current_weather(&city).await?;
    Ok(Json(weather))
}

/// GET /weather/forecast/{city}
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherForecastResponse>, ApiError> {
    info!(%city, "GET forecast");

    let forecast = state.weather.get_forecast(&city).await?;
    Ok(Json(forecast))
}

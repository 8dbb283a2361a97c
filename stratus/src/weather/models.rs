//! Payloads returned by the upstream provider, passed through to clients.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct WeatherCoord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct WeatherDescription {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct WeatherMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i64,
    pub humidity: i64,
    #[serde(default)]
    pub sea_level: Option<i64>,
    #[serde(default)]
    pub grnd_level: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct WeatherWind {
    pub speed: f64,
    pub deg: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct WeatherClouds {
    pub all: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct WeatherSys {
    #[serde(rename = "type", default)]
    #[cfg_attr(feature = "graphql", graphql(name = "type"))]
    pub kind: Option<i64>,
    #[serde(default)]
    pub id: Option<i64>,
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct WeatherResponse {
    pub coord: WeatherCoord,
    pub weather: Vec<WeatherDescription>,
    pub base: String,
    pub main: WeatherMain,
    #[serde(default)]
    pub visibility: Option<i64>,
    pub wind: WeatherWind,
    pub clouds: WeatherClouds,
    pub dt: i64,
    pub sys: WeatherSys,
    pub timezone: i64,
    pub id: i64,
    pub name: String,
    pub cod: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct ForecastItem {
    pub dt: i64,
    pub main: WeatherMain,
    pub weather: Vec<WeatherDescription>,
    pub clouds: WeatherClouds,
    pub wind: WeatherWind,
    pub dt_txt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct ForecastCity {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub population: f64,
    pub timezone: i64,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Five-day forecast in three-hour steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "graphql", graphql(rename_fields = "snake_case"))]
pub struct WeatherForecastResponse {
    pub cod: String,
    pub message: i64,
    pub cnt: i64,
    pub list: Vec<ForecastItem>,
    pub city: ForecastCity,
}

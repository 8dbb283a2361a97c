use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use shared_http::api::{AddLocationRequest, MessageResponse};
use stratus::locations::Location;

/// POST /locations
pub async fn add_location(
    State(state): State<AppState>,
    payload: Result<Json<AddLocationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Location>), ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let city = req.city.unwrap_or_default();

    let location = state.locations.add_location(&city, req.country).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// GET /locations
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Location>>, ApiError> {
    Ok(Json(state.locations.list_locations().await?))
}

/// DELETE /locations/{id}
pub async fn remove_location(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    state.locations.remove_location(id).await?;
    Ok(Json(MessageResponse::new("Location removed")))
}

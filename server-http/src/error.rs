use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared_http::api::ErrorResponse;
use stratus::locations::LocationError;
use stratus::weather::UpstreamError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upstream(UpstreamError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Location(LocationError::InvalidCity) => StatusCode::BAD_REQUEST,
            ApiError::Location(LocationError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Location(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text shown to clients. Upstream and storage details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Upstream(err) => err.user_message().to_string(),
            ApiError::Location(
                LocationError::StorageError(_) | LocationError::SerializationError(_),
            ) => "Internal server error".to_string(),
            ApiError::Location(err) => err.to_string(),
            ApiError::BadRequest(message) => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let body = ErrorResponse::new(
            status.as_u16(),
            self.client_message(),
            status.canonical_reason().unwrap_or("Error"),
        );
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_mapping() {
        let not_found = ApiError::from(UpstreamError::NotFound {
            status: Some(404),
            message: "city not found".into(),
        });
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            not_found.client_message(),
            "City not found. Please check the city name."
        );

        let unavailable = ApiError::from(UpstreamError::Unavailable {
            status: Some(500),
            message: "boom".into(),
        });
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let unknown = ApiError::from(UpstreamError::Unknown {
            status: None,
            message: "connection refused".into(),
        });
        assert_eq!(unknown.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            unknown.client_message(),
            "Failed to fetch data from external API. Please try again later."
        );
    }

    #[test]
    fn test_location_status_mapping() {
        assert_eq!(
            ApiError::from(LocationError::InvalidCity).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LocationError::NotFound(7)).status_code(),
            StatusCode::NOT_FOUND
        );

        let storage = ApiError::from(LocationError::StorageError("disk full".into()));
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!storage.client_message().contains("disk full"));
    }
}

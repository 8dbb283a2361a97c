use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("City name must be a non-empty string.")]
    InvalidCity,

    #[error("Location with id {0} not found.")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sled::Error> for LocationError {
    fn from(err: sled::Error) -> Self {
        LocationError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for LocationError {
    fn from(err: serde_json::Error) -> Self {
        LocationError::SerializationError(err.to_string())
    }
}

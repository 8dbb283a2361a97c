use super::error::LocationError;
use super::models::{Location, NewLocation};
use async_trait::async_trait;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Persist a new location, assigning its id and timestamp
    async fn create(&self, location: NewLocation) -> Result<Location, LocationError>;

    /// List all locations in id order
    async fn find_all(&self) -> Result<Vec<Location>, LocationError>;

    /// Find a location by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, LocationError>;

    /// Delete a location by ID
    async fn delete(&self, id: i64) -> Result<(), LocationError>;
}

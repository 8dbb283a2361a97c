use super::error::LocationError;
use super::models::{Location, NewLocation};
use super::repository::LocationRepository;
use std::sync::Arc;
use tracing::info;

/// Adds, lists and removes saved locations.
pub struct LocationService {
    repo: Arc<dyn LocationRepository>,
}

impl LocationService {
    pub fn new(repo: Arc<dyn LocationRepository>) -> Self {
        Self { repo }
    }

    /// Save a location. The city must contain something other than whitespace.
    pub async fn add_location(
        &self,
        city: &str,
        country: Option<String>,
    ) -> Result<Location, LocationError> {
        if city.trim().is_empty() {
            return Err(LocationError::InvalidCity);
        }

        let location = self.repo.create(NewLocation::new(city, country)).await?;
        info!(id = location.id, city = %location.city, "Location added");
        Ok(location)
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, LocationError> {
        self.repo.find_all().await
    }

    /// Remove a location, failing with `NotFound` before touching storage
    /// when the id is unknown.
    pub async fn remove_location(&self, id: i64) -> Result<(), LocationError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(LocationError::NotFound(id));
        }

        self.repo.delete(id).await?;
        info!(id, "Location removed");
        Ok(())
    }
}

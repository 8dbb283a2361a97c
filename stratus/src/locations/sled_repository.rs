use super::error::LocationError;
use super::models::{Location, NewLocation};
use super::repository::LocationRepository;
use async_trait::async_trait;
use chrono::Utc;
use sled::Db;
use std::path::Path;

const LOCATIONS_TREE: &str = "locations";

#[derive(Clone)]
pub struct SledLocationRepository {
    db: Db,
}

impl SledLocationRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, LocationError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    fn locations_tree(&self) -> Result<sled::Tree, LocationError> {
        Ok(self.db.open_tree(LOCATIONS_TREE)?)
    }

    fn next_id(&self) -> Result<i64, LocationError> {
        let raw = self.db.generate_id()?;
        i64::try_from(raw + 1)
            .map_err(|_| LocationError::StorageError("location id space exhausted".into()))
    }
}

#[async_trait]
impl LocationRepository for SledLocationRepository {
    async fn create(&self, location: NewLocation) -> Result<Location, LocationError> {
        let tree = self.locations_tree()?;

        let location = Location {
            id: self.next_id()?,
            city: location.city,
            country: location.country,
            added_at: Utc::now(),
        };

        tree.insert(location.id.to_be_bytes(), serde_json::to_vec(&location)?)?;
        tree.flush()?;

        Ok(location)
    }

    async fn find_all(&self) -> Result<Vec<Location>, LocationError> {
        let tree = self.locations_tree()?;
        let mut locations = Vec::new();

        for item in tree.iter() {
            let (_, data) = item?;
            locations.push(serde_json::from_slice(&data)?);
        }

        Ok(locations)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, LocationError> {
        let tree = self.locations_tree()?;

        match tree.get(id.to_be_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), LocationError> {
        let tree = self.locations_tree()?;

        if tree.remove(id.to_be_bytes())?.is_none() {
            return Err(LocationError::NotFound(id));
        }
        tree.flush()?;

        Ok(())
    }
}

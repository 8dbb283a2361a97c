use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A city saved by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct Location {
    pub id: i64,
    pub city: String,
    pub country: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Fields supplied when saving a location.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub city: String,
    pub country: Option<String>,
}

impl NewLocation {
    pub fn new(city: impl Into<String>, country: Option<String>) -> Self {
        Self {
            city: city.into(),
            country,
        }
    }
}

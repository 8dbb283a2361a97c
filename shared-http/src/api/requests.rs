use serde::Deserialize;

/// Request body for POST /locations
#[derive(Debug, Deserialize)]
pub struct AddLocationRequest {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

// Public API
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod sled_repository;

pub use error::LocationError;
pub use models::{Location, NewLocation};
pub use repository::LocationRepository;
pub use service::LocationService;
pub use sled_repository::SledLocationRepository;

pub mod health;
pub mod locations;
pub mod weather;

pub use health::health_check;
pub use locations::{add_location, list_locations, remove_location};
pub use weather::{get_current_weather, get_forecast};

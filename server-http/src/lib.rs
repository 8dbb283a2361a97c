pub mod error;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types
pub use middleware::RateLimiter;
pub use routes::{build_app, build_router};
pub use state::AppState;

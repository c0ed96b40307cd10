//! HTTP API handlers for haat-assist

pub mod assistant;
pub mod health;
pub mod products;

pub use assistant::assistant_routes;
pub use health::health_routes;
pub use products::product_routes;

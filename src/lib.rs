// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod stations;

// Re-export commonly used types
pub use error::{AppError, Result};

// App state for sharing across the application
use cache::PlanCache;
use services::trip_planner::TripPlanner;
use std::sync::Arc;

pub struct AppState {
    pub trip_planner: TripPlanner,
    pub cache: Option<Arc<dyn PlanCache>>,
}

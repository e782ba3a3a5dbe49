pub mod debug;
pub mod optimize;

use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/optimize", post(optimize::optimize_route))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}

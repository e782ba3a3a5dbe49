use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Routing API error: {0}")]
    RoutingApi(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Station data error: {0}")]
    StationData(String),

    #[error("Route is not drivable with the configured range: {0}")]
    InfeasibleRoute(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::StationData(e.to_string())
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::RoutingApi(ref e) => {
                tracing::error!("Routing API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error")
            }
            AppError::LocationNotFound(ref e) => {
                tracing::info!("Location not found: {}", e);
                (StatusCode::NOT_FOUND, e.as_str())
            }
            AppError::StationData(ref e) => {
                tracing::error!("Station data error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Station data unavailable")
            }
            AppError::InfeasibleRoute(ref e) => {
                tracing::warn!("Infeasible route: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, e.as_str())
            }
            AppError::Cache(ref e) => {
                tracing::warn!("Cache error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Cache error")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
        };

        let body = Json(json!({
            "success": false,
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

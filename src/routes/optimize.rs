use crate::cache;
use crate::error::{AppError, Result};
use crate::models::{OptimizeRequest, OptimizeResponse};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /optimize
/// Plan the cheapest fuel stops for a drive between two locations
pub async fn optimize_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>> {
    let (start, end) = request.validate().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        start = %start,
        end = %end,
        "Optimize request: {} -> {}",
        start, end
    );

    let cache_key = cache::plan_cache_key(
        state.trip_planner.provider_name(),
        start,
        end,
        state.trip_planner.fuel_config(),
    );

    // Check cache first
    if let Some(ref cache) = state.cache {
        if let Some(cached) = cache.get_cached_plan(&cache_key).await {
            tracing::info!(
                "Cache hit for plan: {} stops returned",
                cached.number_of_stops
            );
            return Ok(Json(cached));
        }
    }

    let trip = state.trip_planner.plan_trip(start, end).await?;
    let response = OptimizeResponse::from_trip(&trip, state.trip_planner.provider_name());

    if let Some(ref cache) = state.cache {
        cache.cache_plan(&cache_key, &response).await;
    }

    Ok(Json(response))
}

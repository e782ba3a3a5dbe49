use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {
            "station_count": state.trip_planner.station_count(),
            "routing_provider": state.trip_planner.provider_name(),
        }
    });

    match state.cache {
        Some(ref cache) => {
            let healthy = cache.health_check().await;
            let stats = cache.get_stats().await;
            status["checks"]["cache"] = json!({
                "backend": cache.backend_name(),
                "healthy": healthy,
                "stats": stats,
            });
            if !healthy {
                status["status"] = json!("degraded");
            }
        }
        None => {
            status["checks"]["cache"] = json!("disabled");
        }
    }

    Json(status)
}

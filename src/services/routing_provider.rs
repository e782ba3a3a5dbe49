use crate::constants::POLYLINE_PRECISION;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, Route};
use async_trait::async_trait;

/// External service that turns two free-form locations into a driving route
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn get_route(&self, start: &str, end: &str) -> Result<Route>;

    fn provider_name(&self) -> &'static str;
}

/// Decode an encoded polyline into route points, dropping consecutive duplicates
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinates>> {
    let line = polyline::decode_polyline(encoded, POLYLINE_PRECISION)
        .map_err(|e| AppError::RoutingApi(format!("Invalid route polyline: {}", e)))?;

    let mut points: Vec<Coordinates> = Vec::with_capacity(line.0.len());
    for coord in line.0 {
        // geo coordinates are x = longitude, y = latitude
        let point = Coordinates::new(coord.y, coord.x).map_err(AppError::RoutingApi)?;
        if points.last() != Some(&point) {
            points.push(point);
        }
    }
    Ok(points)
}

/// Reject routes the planner cannot work with
pub fn ensure_usable(route: &Route) -> Result<()> {
    if route.points.len() < 2 {
        return Err(AppError::RoutingApi(format!(
            "Route has {} points, expected at least 2",
            route.points.len()
        )));
    }
    if !route.total_distance_miles.is_finite() || route.total_distance_miles < 0.0 {
        return Err(AppError::RoutingApi(format!(
            "Route has invalid distance {}",
            route.total_distance_miles
        )));
    }
    Ok(())
}

use crate::config::FuelPlannerConfig;
use crate::models::coordinates::path_length_miles;
use crate::models::{Coordinates, Route, RouteStation};
use crate::stations::StationIndex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Places indexed stations along a route path
#[derive(Clone)]
pub struct StationSnapper {
    index: Arc<StationIndex>,
    snap_radius_miles: f64,
    max_sample_points: usize,
}

impl StationSnapper {
    pub fn new(index: Arc<StationIndex>, config: &FuelPlannerConfig) -> Self {
        StationSnapper {
            index,
            snap_radius_miles: config.station_snap_miles,
            max_sample_points: config.max_sample_points,
        }
    }

    pub fn station_count(&self) -> usize {
        self.index.len()
    }

    /// Find stations near the route path, sorted by road distance from the start
    #[instrument(skip(self, route), fields(points = route.points.len()))]
    pub fn snap_to_route(&self, route: &Route) -> Vec<RouteStation> {
        if route.points.len() < 2 {
            debug!("Route path too short for snapping");
            return Vec::new();
        }

        let sampled = sample_path(&route.points, self.max_sample_points);
        let sampled_length = path_length_miles(&sampled);

        // Lookup points are at most one radius apart, so anything within the radius of
        // the path is within 1.5 radii of some lookup point
        let lookup_radius = self.snap_radius_miles * 1.5;
        let mut candidates: HashSet<usize> = HashSet::new();
        for lookup in densify(&sampled, self.snap_radius_miles) {
            for (idx, _) in self.index.stations_near(&lookup, lookup_radius) {
                candidates.insert(idx);
            }
        }

        debug!(
            "Sampled {} of {} path points, {} candidate stations",
            sampled.len(),
            route.points.len(),
            candidates.len()
        );

        // Positions along the sampled path are rescaled to the provider's road distance
        let scale = if sampled_length > 0.0 {
            route.total_distance_miles / sampled_length
        } else {
            1.0
        };

        let mut snapped: Vec<RouteStation> = candidates
            .into_iter()
            .filter_map(|idx| {
                let station = self.index.get(idx)?;
                let (distance_from_route, _segment, along) =
                    station.coordinates.distance_to_linestring(&sampled)?;
                if distance_from_route > self.snap_radius_miles {
                    return None;
                }
                let route_distance = (along * scale).min(route.total_distance_miles);
                Some(RouteStation::new(
                    station.clone(),
                    route_distance,
                    distance_from_route,
                ))
            })
            .collect();

        snapped.sort_by(|a, b| {
            a.route_distance_miles
                .total_cmp(&b.route_distance_miles)
                .then(a.station.id.cmp(&b.station.id))
        });

        debug!("Snapped {} stations to route", snapped.len());
        snapped
    }
}

/// Every `max(1, len / max_points)`th point, always ending on the last one
fn sample_path(points: &[Coordinates], max_points: usize) -> Vec<Coordinates> {
    let step = (points.len() / max_points.max(1)).max(1);
    let mut sampled: Vec<Coordinates> = points.iter().step_by(step).copied().collect();

    if let Some(last) = points.last() {
        if sampled.last() != Some(last) {
            sampled.push(*last);
        }
    }
    sampled
}

/// Path points plus interpolated points so that no two consecutive points
/// are more than `spacing_miles` apart
fn densify(path: &[Coordinates], spacing_miles: f64) -> Vec<Coordinates> {
    let mut dense = Vec::with_capacity(path.len());
    for window in path.windows(2) {
        let (from, to) = (&window[0], &window[1]);
        dense.push(*from);

        let length = from.distance_to(to);
        if spacing_miles > 0.0 && length > spacing_miles {
            let pieces = (length / spacing_miles).ceil() as usize;
            for i in 1..pieces {
                dense.push(from.lerp(to, i as f64 / pieces as f64));
            }
        }
    }
    if let Some(last) = path.last() {
        dense.push(*last);
    }
    dense
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FuelStation;

    fn point(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    fn station(id: u64, lat: f64, lon: f64, price: f64) -> FuelStation {
        FuelStation {
            id,
            name: format!("Stop {}", id),
            address: "I-70, EXIT 1".to_string(),
            city: "Town".to_string(),
            state: "KS".to_string(),
            rack_id: None,
            price_per_gallon: price,
            coordinates: point(lat, lon),
        }
    }

    fn snapper(stations: Vec<FuelStation>) -> StationSnapper {
        StationSnapper::new(
            Arc::new(StationIndex::new(stations)),
            &FuelPlannerConfig::default(),
        )
    }

    /// Straight east-west route along 38N with only its endpoints
    fn straight_route(total_distance_miles: f64) -> Route {
        Route::new(vec![point(38.0, -100.0), point(38.0, -95.0)], total_distance_miles)
    }

    #[test]
    fn test_sample_path_keeps_last_point() {
        let points: Vec<Coordinates> = (0..10).map(|i| point(38.0, -100.0 + i as f64 * 0.1)).collect();

        let sampled = sample_path(&points, 4);
        // step = 10 / 4 = 2
        assert_eq!(sampled.len(), 6);
        assert_eq!(sampled.first(), points.first());
        assert_eq!(sampled.last(), points.last());

        assert_eq!(sample_path(&points, 1500).len(), 10);
    }

    #[test]
    fn test_densify_limits_spacing() {
        let path = vec![point(38.0, -100.0), point(38.0, -99.0)];
        let dense = densify(&path, 7.0);
        assert!(dense.len() > 2);
        for pair in dense.windows(2) {
            assert!(pair[0].distance_to(&pair[1]) <= 7.0 + 1e-6);
        }
        assert_eq!(dense.last(), path.last());
    }

    #[test]
    fn test_snaps_stations_near_long_segment() {
        // Midway along a ~272 mile segment with no intermediate path points
        let snapper = snapper(vec![
            station(1, 38.02, -97.5, 3.0),  // ~1.4 miles off the road
            station(2, 38.50, -97.5, 3.0),  // ~35 miles off the road
        ]);

        let snapped = snapper.snap_to_route(&straight_route(272.0));
        assert_eq!(snapped.len(), 1);
        assert_eq!(snapped[0].station.id, 1);
        assert!(snapped[0].distance_from_route_miles < 2.0);
        assert!((snapped[0].route_distance_miles - 136.0).abs() < 3.0);
    }

    #[test]
    fn test_route_distance_scaled_to_road_distance() {
        let snapper = snapper(vec![station(1, 38.0, -97.5, 3.0)]);
        let route = straight_route(272.0);
        let straight_length = path_length_miles(&route.points);

        // Road is 50% longer than the straight-line path
        let road = Route::new(route.points.clone(), straight_length * 1.5);
        let snapped = snapper.snap_to_route(&road);

        assert_eq!(snapped.len(), 1);
        let expected = straight_length * 0.5 * 1.5;
        assert!((snapped[0].route_distance_miles - expected).abs() < 1.0);
    }

    #[test]
    fn test_results_sorted_by_route_distance() {
        let snapper = snapper(vec![
            station(10, 38.0, -96.0, 3.0),
            station(11, 38.0, -99.0, 3.0),
            station(12, 38.0, -97.0, 3.0),
        ]);

        let snapped = snapper.snap_to_route(&straight_route(272.0));
        let ids: Vec<u64> = snapped.iter().map(|s| s.station.id).collect();
        assert_eq!(ids, vec![11, 12, 10]);
        assert!(snapped
            .windows(2)
            .all(|w| w[0].route_distance_miles <= w[1].route_distance_miles));
    }

    #[test]
    fn test_short_route_has_no_stations() {
        let snapper = snapper(vec![station(1, 38.0, -100.0, 3.0)]);
        let route = Route::new(vec![point(38.0, -100.0)], 0.0);
        assert!(snapper.snap_to_route(&route).is_empty());
        assert_eq!(snapper.station_count(), 1);
    }
}

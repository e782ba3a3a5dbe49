//! Greedy fuel stop selection.
//!
//! The truck leaves with a full tank and always refills to full. From the
//! current position it looks at every station it can reach, prefers the ones
//! at least `search_start_miles` ahead (so each stop uses most of a tank),
//! and takes the cheapest of those.

use crate::config::FuelPlannerConfig;
use crate::error::{AppError, Result};
use crate::models::{FuelPlan, PlannedStop, RouteStation};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FuelPlanner {
    config: FuelPlannerConfig,
}

impl FuelPlanner {
    pub fn new(config: FuelPlannerConfig) -> Self {
        FuelPlanner { config }
    }

    pub fn config(&self) -> &FuelPlannerConfig {
        &self.config
    }

    /// Choose fuel stops for a route.
    ///
    /// `stations` must be sorted by `route_distance_miles`.
    pub fn plan(&self, stations: &[RouteStation], total_distance_miles: f64) -> Result<FuelPlan> {
        if !total_distance_miles.is_finite() || total_distance_miles < 0.0 {
            return Err(AppError::InvalidRequest(format!(
                "Invalid route distance: {}",
                total_distance_miles
            )));
        }

        let chosen = self.select_stops(stations, total_distance_miles)?;
        let plan = self.price_stops(chosen, stations, total_distance_miles);

        debug!(
            stops = plan.stops.len(),
            total_cost = plan.total_cost,
            "Planned {} fuel stops over {:.1}mi",
            plan.stops.len(),
            total_distance_miles
        );

        Ok(plan)
    }

    fn select_stops<'a>(
        &self,
        stations: &'a [RouteStation],
        total: f64,
    ) -> Result<Vec<&'a RouteStation>> {
        let range = self.config.tank_range_miles;
        let search_start = self.config.search_start_miles;

        let mut position = 0.0;
        let mut chosen = Vec::new();

        while total - position > range {
            let limit = (position + range).min(total);
            let reachable: Vec<&RouteStation> = stations
                .iter()
                .filter(|s| s.route_distance_miles > position && s.route_distance_miles <= limit)
                .collect();

            if reachable.is_empty() {
                return Err(infeasible(stations, position, range));
            }

            let window_start = position + search_start;
            let next = cheapest(
                reachable
                    .iter()
                    .copied()
                    .filter(|s| s.route_distance_miles >= window_start),
            )
            .or_else(|| cheapest(reachable.iter().copied()));

            let Some(next) = next else {
                return Err(infeasible(stations, position, range));
            };

            debug!(
                station_id = next.station.id,
                at_mile = next.route_distance_miles,
                price = next.price(),
                "Fuel stop at mile {:.1}: {} (${:.3})",
                next.route_distance_miles,
                next.station.name,
                next.price()
            );

            position = next.route_distance_miles;
            chosen.push(next);
        }

        Ok(chosen)
    }

    fn price_stops(
        &self,
        chosen: Vec<&RouteStation>,
        route_stations: &[RouteStation],
        total: f64,
    ) -> FuelPlan {
        let mpg = self.config.miles_per_gallon;

        let mut stops = Vec::with_capacity(chosen.len());
        for (i, stop) in chosen.iter().enumerate() {
            let next_position = chosen
                .get(i + 1)
                .map(|s| s.route_distance_miles)
                .unwrap_or(total);
            let leg_miles = next_position - stop.route_distance_miles;
            let gallons = leg_miles / mpg;

            stops.push(PlannedStop {
                station: (*stop).clone(),
                leg_miles,
                gallons,
                cost: gallons * stop.price(),
            });
        }

        let total_gallons: f64 = stops.iter().map(|s| s.gallons).sum();
        let total_cost: f64 = stops.iter().map(|s| s.cost).sum();
        let average_price = mean(stops.iter().map(|s| s.station.price()));
        let route_average_price = mean(route_stations.iter().map(|s| s.price()));
        let savings = route_average_price.map(|avg| avg * total_gallons - total_cost);

        FuelPlan {
            stops,
            total_gallons,
            total_cost,
            average_price,
            route_average_price,
            savings,
        }
    }
}

/// Lowest price; ties keep the earliest station
fn cheapest<'a>(candidates: impl Iterator<Item = &'a RouteStation>) -> Option<&'a RouteStation> {
    candidates.min_by(|a, b| a.price().total_cmp(&b.price()))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn infeasible(stations: &[RouteStation], position: f64, range: f64) -> AppError {
    match stations.iter().find(|s| s.route_distance_miles > position) {
        Some(next) => AppError::InfeasibleRoute(format!(
            "No fuel station within {:.0} miles of mile {:.1}; next station is {:.1} miles ahead",
            range,
            position,
            next.route_distance_miles - position
        )),
        None => AppError::InfeasibleRoute(format!(
            "No fuel station ahead of mile {:.1} and the destination is beyond tank range",
            position
        )),
    }
}

use crate::config::FuelPlannerConfig;
use crate::error::Result;
use crate::models::TripPlan;
use crate::services::fuel_planner::FuelPlanner;
use crate::services::routing_provider::RoutingProvider;
use crate::services::station_snapping::StationSnapper;
use std::sync::Arc;
use tracing::instrument;

/// Route lookup, station snapping and stop selection for one trip
pub struct TripPlanner {
    provider: Arc<dyn RoutingProvider>,
    snapper: StationSnapper,
    fuel_planner: FuelPlanner,
}

impl TripPlanner {
    pub fn new(
        provider: Arc<dyn RoutingProvider>,
        snapper: StationSnapper,
        fuel_planner: FuelPlanner,
    ) -> Self {
        TripPlanner {
            provider,
            snapper,
            fuel_planner,
        }
    }

    #[instrument(skip(self))]
    pub async fn plan_trip(&self, start: &str, end: &str) -> Result<TripPlan> {
        let route = self.provider.get_route(start, end).await?;
        tracing::info!(
            provider = self.provider.provider_name(),
            points = route.points.len(),
            distance_mi = %format!("{:.1}", route.total_distance_miles),
            "Route {} -> {}: {:.1}mi, {} points",
            start,
            end,
            route.total_distance_miles,
            route.points.len()
        );

        let route_stations = self.snapper.snap_to_route(&route);
        tracing::info!(
            stations = route_stations.len(),
            "Found {} fuel stations along route",
            route_stations.len()
        );

        let fuel = self
            .fuel_planner
            .plan(&route_stations, route.total_distance_miles)?;
        tracing::info!(
            stops = fuel.stops.len(),
            total_cost = %format!("{:.2}", fuel.total_cost),
            "Selected {} fuel stops",
            fuel.stops.len()
        );

        Ok(TripPlan {
            route,
            route_station_count: route_stations.len(),
            fuel,
        })
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub fn station_count(&self) -> usize {
        self.snapper.station_count()
    }

    pub fn fuel_config(&self) -> &FuelPlannerConfig {
        self.fuel_planner.config()
    }
}

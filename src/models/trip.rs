use crate::constants::MAX_LOCATION_LENGTH;
use crate::models::{Coordinates, RouteStation};
use serde::{Deserialize, Serialize};

/// Driving route as returned by a routing provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    /// Ordered path from start to end
    pub points: Vec<Coordinates>,
    /// Road distance reported by the provider (miles)
    pub total_distance_miles: f64,
}

impl Route {
    pub fn new(points: Vec<Coordinates>, total_distance_miles: f64) -> Self {
        Route {
            points,
            total_distance_miles,
        }
    }
}

/// A station the planner decided to stop at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedStop {
    #[serde(flatten)]
    pub station: RouteStation,
    /// Miles driven on this fill before the next stop or the destination
    pub leg_miles: f64,
    pub gallons: f64,
    pub cost: f64,
}

/// Output of the fuel planner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FuelPlan {
    pub stops: Vec<PlannedStop>,
    pub total_gallons: f64,
    pub total_cost: f64,
    /// Unweighted mean price of the chosen stops
    pub average_price: Option<f64>,
    /// Mean price of every station found along the route
    pub route_average_price: Option<f64>,
    /// What the purchased gallons would cost at the route average, minus what they cost
    pub savings: Option<f64>,
}

/// Everything computed for one optimize request
#[derive(Debug, Clone)]
pub struct TripPlan {
    pub route: Route,
    pub route_station_count: usize,
    pub fuel: FuelPlan,
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl OptimizeRequest {
    /// Trimmed `(start, end)`. Both must be present, non-blank and at most
    /// [`MAX_LOCATION_LENGTH`] characters.
    pub fn validate(&self) -> Result<(&str, &str), String> {
        match (usable_location(&self.start), usable_location(&self.end)) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err("start and end locations required".to_string()),
        }
    }
}

fn usable_location(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.chars().count() <= MAX_LOCATION_LENGTH)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteSummary {
    /// All route points, for drawing the polyline
    pub points: Vec<Coordinates>,
    pub total_distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelStopResponse {
    pub name: String,
    pub city: String,
    pub state: String,
    pub price: f64,
    pub location: Coordinates,
    pub route_distance: f64,
    pub gallons: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizeResponse {
    pub success: bool,
    pub provider: String,
    pub route: RouteSummary,
    pub fuel_stops: Vec<FuelStopResponse>,
    pub total_fuel_cost: f64,
    pub average_price_per_gallon: Option<f64>,
    pub route_average_price: Option<f64>,
    pub total_gallons: f64,
    pub total_savings_based_on_average_price_for_route: Option<f64>,
    pub number_of_stops: usize,
}

impl OptimizeResponse {
    pub fn from_trip(trip: &TripPlan, provider: &str) -> Self {
        let fuel_stops = trip
            .fuel
            .stops
            .iter()
            .map(|stop| {
                let station = &stop.station.station;
                FuelStopResponse {
                    name: station.name.clone(),
                    city: station.city.clone(),
                    state: station.state.clone(),
                    price: station.price_per_gallon,
                    location: station.coordinates,
                    route_distance: round_to(stop.station.route_distance_miles, 1),
                    gallons: round_to(stop.gallons, 1),
                    cost: round_to(stop.cost, 2),
                }
            })
            .collect::<Vec<_>>();

        OptimizeResponse {
            success: true,
            provider: provider.to_string(),
            route: RouteSummary {
                points: trip.route.points.clone(),
                total_distance: round_to(trip.route.total_distance_miles, 1),
            },
            number_of_stops: fuel_stops.len(),
            fuel_stops,
            total_fuel_cost: round_to(trip.fuel.total_cost, 2),
            average_price_per_gallon: trip.fuel.average_price.map(|p| round_to(p, 3)),
            route_average_price: trip.fuel.route_average_price.map(|p| round_to(p, 3)),
            total_gallons: round_to(trip.fuel.total_gallons, 1),
            total_savings_based_on_average_price_for_route: trip
                .fuel
                .savings
                .map(|s| round_to(s, 2)),
        }
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let multiplier = 10_f64.powi(decimal_places as i32);
    (value * multiplier).round() / multiplier
}

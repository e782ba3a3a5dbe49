use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// A truck stop with its current retail diesel price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelStation {
    /// OPIS truck stop identifier
    pub id: u64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack_id: Option<u64>,
    pub price_per_gallon: f64,
    pub coordinates: Coordinates,
}

/// A station placed along a specific route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteStation {
    #[serde(flatten)]
    pub station: FuelStation,
    /// Road distance from the route start (miles)
    pub route_distance_miles: f64,
    /// Perpendicular distance from the route path (miles)
    pub distance_from_route_miles: f64,
}

impl RouteStation {
    pub fn new(station: FuelStation, route_distance_miles: f64, distance_from_route_miles: f64) -> Self {
        RouteStation {
            station,
            route_distance_miles,
            distance_from_route_miles,
        }
    }

    pub fn price(&self) -> f64 {
        self.station.price_per_gallon
    }
}

//! Stable application-wide constants.
//!
//! Values here are unit conversions, structural limits, and default
//! fallbacks for env-var-based configuration. Vehicle and route-join tuning
//! knobs live in [`FuelPlannerConfig`](crate::config::FuelPlannerConfig).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "8000";

// --- Unit conversions ---

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;
/// Mean Earth radius in miles, for haversine distances.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;
/// Approximate length of one degree of latitude, in miles.
pub const MILES_PER_DEGREE_LAT: f64 = 69.0;

// --- Routing providers ---

/// Default OpenRouteService API root.
pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";
/// Default Google Directions JSON endpoint.
pub const DEFAULT_GOOGLE_DIRECTIONS_URL: &str =
    "https://maps.googleapis.com/maps/api/directions/json";
/// Per-request timeout for routing provider calls. Overridden by `ROUTING_TIMEOUT_SECONDS`.
pub const DEFAULT_ROUTING_TIMEOUT_SECONDS: u64 = 30;
/// Precision used by the encoded polylines both providers return.
pub const POLYLINE_PRECISION: u32 = 5;
/// Longest location string accepted in an optimize request.
pub const MAX_LOCATION_LENGTH: usize = 200;

// --- Station data ---

/// Default path of the geocoded fuel price CSV. Overridden by `FUEL_PRICES_CSV`.
pub const DEFAULT_FUEL_PRICES_CSV: &str = "fuel_prices_with_coords.csv";
/// Side length (degrees) of the lat/lon grid cells used by the station index.
pub const STATION_GRID_CELL_DEGREES: f64 = 0.5;

// --- Fuel planner defaults (used when FUEL_* env vars are absent) ---

/// Distance a full tank covers, in miles.
pub const DEFAULT_TANK_RANGE_MILES: f64 = 500.0;
/// Vehicle fuel economy in miles per gallon.
pub const DEFAULT_MILES_PER_GALLON: f64 = 10.0;
/// Miles after the last fill-up at which the planner starts preferring stations.
pub const DEFAULT_SEARCH_START_MILES: f64 = 350.0;
/// Maximum distance (miles) between a station and the route for it to count as on-route.
pub const DEFAULT_STATION_SNAP_MILES: f64 = 7.0;
/// Upper bound on route points used when joining stations to the route.
pub const DEFAULT_MAX_SAMPLE_POINTS: usize = 1500;

// --- Plan cache ---

/// Default plan cache TTL: 24 hours. Overridden by `PLAN_CACHE_TTL`.
pub const DEFAULT_PLAN_CACHE_TTL_SECONDS: u64 = 86_400;
/// Maximum entries kept by the in-memory plan cache.
pub const DEFAULT_MEMORY_CACHE_MAX_ENTRIES: u64 = 1_000;

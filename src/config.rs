use crate::constants::*;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingProviderKind {
    #[default]
    OpenRouteService,
    GoogleMaps,
}

impl std::str::FromStr for RoutingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ors" | "openrouteservice" => Ok(RoutingProviderKind::OpenRouteService),
            "google" | "googlemaps" | "google_maps" => Ok(RoutingProviderKind::GoogleMaps),
            _ => Err(format!(
                "Invalid routing provider: {}. Use 'ors' or 'google'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub routing_provider: RoutingProviderKind,
    /// API key for the selected routing provider
    pub routing_api_key: String,
    /// Overrides the provider's default endpoint (tests, proxies)
    pub routing_base_url: Option<String>,
    pub routing_timeout_seconds: u64,
    pub fuel_prices_csv: String,
    pub redis_url: Option<String>,
    /// Explicit `PLAN_CACHE_TTL`; see [`Config::plan_cache_ttl_seconds`]
    pub plan_cache_ttl: Option<u64>,
    pub fuel_planner: FuelPlannerConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuelPlannerConfig {
    /// Miles covered by a full tank
    pub tank_range_miles: f64,

    /// Vehicle fuel economy
    pub miles_per_gallon: f64,

    /// Distance since the last fill-up after which stations are preferred.
    /// Stations between this mark and the tank range form the search window.
    pub search_start_miles: f64,

    /// Stations farther than this from the route path are ignored
    pub station_snap_miles: f64,

    /// Route polylines are down-sampled to at most this many points before
    /// stations are projected onto them
    pub max_sample_points: usize,
}

impl Default for FuelPlannerConfig {
    fn default() -> Self {
        Self {
            tank_range_miles: DEFAULT_TANK_RANGE_MILES,
            miles_per_gallon: DEFAULT_MILES_PER_GALLON,
            search_start_miles: DEFAULT_SEARCH_START_MILES,
            station_snap_miles: DEFAULT_STATION_SNAP_MILES,
            max_sample_points: DEFAULT_MAX_SAMPLE_POINTS,
        }
    }
}

impl FuelPlannerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            tank_range_miles: env::var("FUEL_TANK_RANGE_MILES")
                .unwrap_or_else(|_| defaults.tank_range_miles.to_string())
                .parse()
                .map_err(|_| "Invalid FUEL_TANK_RANGE_MILES")?,

            miles_per_gallon: env::var("FUEL_MPG")
                .unwrap_or_else(|_| defaults.miles_per_gallon.to_string())
                .parse()
                .map_err(|_| "Invalid FUEL_MPG")?,

            search_start_miles: env::var("FUEL_SEARCH_START_MILES")
                .unwrap_or_else(|_| defaults.search_start_miles.to_string())
                .parse()
                .map_err(|_| "Invalid FUEL_SEARCH_START_MILES")?,

            station_snap_miles: env::var("FUEL_STATION_SNAP_MILES")
                .unwrap_or_else(|_| defaults.station_snap_miles.to_string())
                .parse()
                .map_err(|_| "Invalid FUEL_STATION_SNAP_MILES")?,

            max_sample_points: env::var("ROUTE_MAX_SAMPLE_POINTS")
                .unwrap_or_else(|_| defaults.max_sample_points.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_MAX_SAMPLE_POINTS")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.tank_range_miles.is_finite() || self.tank_range_miles <= 0.0 {
            return Err("FUEL_TANK_RANGE_MILES must be a positive number".to_string());
        }
        if !self.miles_per_gallon.is_finite() || self.miles_per_gallon <= 0.0 {
            return Err("FUEL_MPG must be a positive number".to_string());
        }
        if !(0.0..=self.tank_range_miles).contains(&self.search_start_miles) {
            return Err(
                "FUEL_SEARCH_START_MILES must be between 0 and the tank range".to_string(),
            );
        }
        if self.station_snap_miles <= 0.0 || self.station_snap_miles > 50.0 {
            return Err("FUEL_STATION_SNAP_MILES must be between 0 and 50 miles".to_string());
        }
        if self.max_sample_points < 2 {
            return Err("ROUTE_MAX_SAMPLE_POINTS must be at least 2".to_string());
        }
        Ok(())
    }

    /// Gallons held by a full tank
    pub fn tank_capacity_gallons(&self) -> f64 {
        self.tank_range_miles / self.miles_per_gallon
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let routing_provider: RoutingProviderKind = env::var("ROUTING_PROVIDER")
            .unwrap_or_else(|_| "ors".to_string())
            .parse()?;

        let (routing_api_key, routing_base_url) = match routing_provider {
            RoutingProviderKind::OpenRouteService => (
                env::var("ORS_API_KEY").map_err(|_| "ORS_API_KEY must be set")?,
                env::var("ORS_BASE_URL").ok(),
            ),
            RoutingProviderKind::GoogleMaps => (
                env::var("GOOGLE_MAPS_API_KEY").map_err(|_| "GOOGLE_MAPS_API_KEY must be set")?,
                env::var("GOOGLE_DIRECTIONS_BASE_URL").ok(),
            ),
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            routing_provider,
            routing_api_key,
            routing_base_url,
            routing_timeout_seconds: env::var("ROUTING_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_ROUTING_TIMEOUT_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTING_TIMEOUT_SECONDS")?,
            fuel_prices_csv: env::var("FUEL_PRICES_CSV")
                .unwrap_or_else(|_| DEFAULT_FUEL_PRICES_CSV.to_string()),
            redis_url: env::var("REDIS_URL").ok(),
            plan_cache_ttl: env::var("PLAN_CACHE_TTL")
                .ok()
                .map(|v| v.parse())
                .transpose()
                .map_err(|_| "Invalid PLAN_CACHE_TTL")?,
            fuel_planner: FuelPlannerConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// TTL for cached plans, or `None` when plan caching is off.
    /// Caching is enabled by `REDIS_URL` or an explicit `PLAN_CACHE_TTL`.
    pub fn plan_cache_ttl_seconds(&self) -> Option<u64> {
        match (&self.redis_url, self.plan_cache_ttl) {
            (_, Some(ttl)) => Some(ttl),
            (Some(_), None) => Some(DEFAULT_PLAN_CACHE_TTL_SECONDS),
            (None, None) => None,
        }
    }
}

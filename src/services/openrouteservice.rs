use crate::constants::{DEFAULT_ORS_BASE_URL, DEFAULT_ROUTING_TIMEOUT_SECONDS};
use crate::error::{AppError, Result};
use crate::models::{trip::round_to, Coordinates, DistanceMeters, Route};
use crate::services::routing_provider::{decode_polyline, ensure_usable, RoutingProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// OpenRouteService client: Pelias geocoding plus driving-car directions
#[derive(Clone)]
pub struct OrsClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OrsClient {
    pub fn new(api_key: String) -> Self {
        OrsClient {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_ORS_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_ROUTING_TIMEOUT_SECONDS),
        }
    }

    pub fn with_config(api_key: String, base_url: String, timeout: Duration) -> Self {
        OrsClient {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Resolve a free-form location to coordinates (first match wins)
    pub async fn geocode(&self, location: &str) -> Result<Coordinates> {
        let url = format!("{}/geocode/search", self.base_url);

        tracing::debug!(location = %location, "ORS geocode request: {}", location);

        let response = self
            .client
            .get(&url)
            .query(&[("text", location)])
            .header("Authorization", &self.api_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Geocode request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                location = %location,
                "ORS geocode HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::RoutingApi(format!(
                "Geocode HTTP {}: {}",
                status, error_text
            )));
        }

        let geocode: OrsGeocodeResponse = response
            .json()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to parse geocode response: {}", e)))?;

        let feature = geocode.features.first().ok_or_else(|| {
            AppError::LocationNotFound(format!("Could not find location '{}'", location))
        })?;

        // GeoJSON order is [lon, lat]
        let [lon, lat] = feature.geometry.coordinates;
        Coordinates::new(lat, lon).map_err(AppError::RoutingApi)
    }

    /// Driving directions between two points
    pub async fn get_directions(&self, start: &Coordinates, end: &Coordinates) -> Result<Route> {
        let url = format!("{}/v2/directions/driving-car/json", self.base_url);
        let body = json!({
            "coordinates": [[start.lon, start.lat], [end.lon, end.lat]]
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Directions request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                "ORS directions HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::RoutingApi(format!(
                "Directions HTTP {}: {}",
                status, error_text
            )));
        }

        let directions: OrsDirectionsResponse = response.json().await.map_err(|e| {
            AppError::RoutingApi(format!("Failed to parse directions response: {}", e))
        })?;

        let route = directions
            .routes
            .first()
            .ok_or_else(|| AppError::RoutingApi("No routes found".to_string()))?;

        let points = decode_polyline(&route.geometry)?;
        let distance = DistanceMeters::new(route.summary.distance).map_err(AppError::RoutingApi)?;
        let total_distance_miles = round_to(distance.to_miles().as_miles(), 2);

        tracing::debug!(
            distance_mi = %format!("{:.1}", total_distance_miles),
            path_points = points.len(),
            "ORS response: {:.1}mi, {} path points",
            total_distance_miles, points.len()
        );

        Ok(Route::new(points, total_distance_miles))
    }
}

#[async_trait]
impl RoutingProvider for OrsClient {
    async fn get_route(&self, start: &str, end: &str) -> Result<Route> {
        let (start_coords, end_coords) =
            futures::try_join!(self.geocode(start), self.geocode(end))?;

        let route = self.get_directions(&start_coords, &end_coords).await?;
        ensure_usable(&route)?;
        Ok(route)
    }

    fn provider_name(&self) -> &'static str {
        "openrouteservice"
    }
}

// OpenRouteService API response types

#[derive(Debug, Deserialize)]
struct OrsGeocodeResponse {
    #[serde(default)]
    features: Vec<OrsFeature>,
}

#[derive(Debug, Deserialize)]
struct OrsFeature {
    geometry: OrsPointGeometry,
}

#[derive(Debug, Deserialize)]
struct OrsPointGeometry {
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct OrsDirectionsResponse {
    #[serde(default)]
    routes: Vec<OrsRoute>,
}

#[derive(Debug, Deserialize)]
struct OrsRoute {
    summary: OrsSummary,
    /// Encoded polyline, precision 5
    geometry: String,
}

#[derive(Debug, Deserialize)]
struct OrsSummary {
    #[serde(default)]
    distance: f64, // meters
}

use crate::constants::{DEFAULT_GOOGLE_DIRECTIONS_URL, DEFAULT_ROUTING_TIMEOUT_SECONDS};
use crate::error::{AppError, Result};
use crate::models::{trip::round_to, Coordinates, DistanceMeters, Route};
use crate::services::routing_provider::{decode_polyline, ensure_usable, RoutingProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Google Directions API client. Geocoding happens server-side from the
/// origin/destination strings.
#[derive(Clone)]
pub struct GoogleDirectionsClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GoogleDirectionsClient {
    pub fn new(api_key: String) -> Self {
        GoogleDirectionsClient {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_GOOGLE_DIRECTIONS_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_ROUTING_TIMEOUT_SECONDS),
        }
    }

    pub fn with_config(api_key: String, base_url: String, timeout: Duration) -> Self {
        GoogleDirectionsClient {
            client: Client::new(),
            api_key,
            base_url,
            timeout,
        }
    }
}

#[async_trait]
impl RoutingProvider for GoogleDirectionsClient {
    async fn get_route(&self, start: &str, end: &str) -> Result<Route> {
        tracing::info!(
            start = %start,
            end = %end,
            "Google directions request: {} -> {}",
            start, end
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("origin", start),
                ("destination", end),
                ("key", self.api_key.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "Google directions HTTP error {}: {}", status, error_text);
            return Err(AppError::RoutingApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let directions: GoogleDirectionsResponse = response
            .json()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to parse response: {}", e)))?;

        let route = directions.into_route(start, end)?;
        ensure_usable(&route)?;

        tracing::debug!(
            distance_mi = %format!("{:.1}", route.total_distance_miles),
            path_points = route.points.len(),
            "Google response: {:.1}mi, {} path points",
            route.total_distance_miles, route.points.len()
        );

        Ok(route)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}

// Google Directions API response types

#[derive(Debug, Deserialize)]
struct GoogleDirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<GoogleRoute>,
}

#[derive(Debug, Deserialize)]
struct GoogleRoute {
    legs: Vec<GoogleLeg>,
}

#[derive(Debug, Deserialize)]
struct GoogleLeg {
    distance: GoogleValue,
    steps: Vec<GoogleStep>,
}

#[derive(Debug, Deserialize)]
struct GoogleValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct GoogleStep {
    polyline: GooglePolyline,
}

#[derive(Debug, Deserialize)]
struct GooglePolyline {
    points: String,
}

impl GoogleDirectionsResponse {
    fn into_route(self, start: &str, end: &str) -> Result<Route> {
        match self.status.as_str() {
            "OK" => {}
            "NOT_FOUND" | "ZERO_RESULTS" => {
                return Err(AppError::LocationNotFound(format!(
                    "No driving route between '{}' and '{}'",
                    start, end
                )));
            }
            other => {
                return Err(AppError::RoutingApi(format!(
                    "Route API failed: {} - {}",
                    other,
                    self.error_message.as_deref().unwrap_or("No error message")
                )));
            }
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| AppError::RoutingApi("No routes found".to_string()))?;

        let mut points: Vec<Coordinates> = Vec::new();
        let mut distance_meters = 0.0;

        for leg in &route.legs {
            distance_meters += leg.distance.value;
            for step in &leg.steps {
                for point in decode_polyline(&step.polyline.points)? {
                    // Steps share their boundary point
                    if points.last() != Some(&point) {
                        points.push(point);
                    }
                }
            }
        }

        let distance = DistanceMeters::new(distance_meters).map_err(AppError::RoutingApi)?;
        Ok(Route::new(points, round_to(distance.to_miles().as_miles(), 2)))
    }
}

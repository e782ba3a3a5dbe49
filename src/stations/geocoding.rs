//! Geocoding of raw truck stop addresses through Nominatim.
//!
//! Truck stop addresses are highway descriptions ("I-44, EXIT 283 & US-69")
//! rather than street addresses, so each station is tried against a list of
//! progressively coarser queries ending with the city itself.

use crate::error::{AppError, Result};
use crate::models::Coordinates;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "FuelStationLocator/1.0";
const REQUEST_TIMEOUT_SECONDS: u64 = 20;

lazy_static! {
    static ref INTERSTATE_REGEX: Regex = Regex::new(r"I-([0-9A-Za-z]+)").unwrap();
    static ref EXIT_REGEX: Regex = Regex::new(r"(?i)EXIT\s+(\d+[A-Z]?)").unwrap();
    static ref US_ROUTE_REGEX: Regex = Regex::new(r"US-?\s*(\d+)").unwrap();
    static ref STATE_ROUTE_REGEX: Regex = Regex::new(r"SR-?\s*(\d+)").unwrap();
}

/// Search queries to try for one station, most specific first
pub fn address_variants(address: &str, city: &str, state: &str) -> Vec<String> {
    let address = address.trim();
    let mut variants = Vec::new();

    if address.contains("I-") || address.contains("Interstate") {
        let interstate = first_capture(&INTERSTATE_REGEX, address);
        // Exit letters are normalised: `exit 12a` and `EXIT 12A` are the same exit
        let exit = first_capture(&EXIT_REGEX, address).map(|e| e.to_ascii_uppercase());

        if let (Some(interstate), Some(exit)) = (interstate, exit) {
            variants.push(format!(
                "Interstate {} mile {}, {}, {}",
                interstate, exit, city, state
            ));
            variants.push(format!("Interstate {}, {}, {}", interstate, city, state));
        }
    }

    if address.contains("US-") || address.contains("US ") {
        if let Some(route) = first_capture(&US_ROUTE_REGEX, address) {
            variants.push(format!("US Route {}, {}, {}", route, city, state));
        }
    }

    if address.contains("SR-") || address.contains("SR ") {
        if let Some(route) = first_capture(&STATE_ROUTE_REGEX, address) {
            variants.push(format!("State Route {}, {}, {}", route, city, state));
        }
    }

    variants.push(format!("{}, {}", city, state));
    variants
}

/// First capture group of the leftmost match
fn first_capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_SEARCH_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        NominatimClient {
            client: Client::new(),
            base_url,
        }
    }

    /// Geocode one free-form US query. `Ok(None)` means no match.
    pub async fn search(&self, query: &str) -> Result<Option<Coordinates>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", "us"),
            ])
            .header("User-Agent", USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .send()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Nominatim returned {}", response.status());
            return Ok(None);
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to parse Nominatim response: {}", e)))?;

        Ok(places.first().and_then(|place| {
            let lat = place.lat.parse().ok()?;
            let lon = place.lon.parse().ok()?;
            Coordinates::new(lat, lon).ok()
        }))
    }

    /// Try every address variant in order, returning the first match
    pub async fn geocode_station(
        &self,
        address: &str,
        city: &str,
        state: &str,
        delay: Duration,
    ) -> Option<Coordinates> {
        for query in address_variants(address, city, state) {
            tokio::time::sleep(delay).await;
            match self.search(&query).await {
                Ok(Some(coords)) => return Some(coords),
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!("Geocoding '{}' failed: {}", query, e);
                }
            }
        }

        tracing::warn!(
            "No coordinates found for any variant of: {}, {}, {}",
            address,
            city,
            state
        );
        None
    }
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interstate_with_exit() {
        let variants = address_variants("I-44, EXIT 283 & US-69", "Big Cabin", "OK");
        assert_eq!(
            variants,
            vec![
                "Interstate 44 mile 283, Big Cabin, OK",
                "Interstate 44, Big Cabin, OK",
                "US Route 69, Big Cabin, OK",
                "Big Cabin, OK",
            ]
        );
    }

    #[test]
    fn exit_with_letter_suffix() {
        let variants = address_variants("I-95 Exit 12a", "Fayetteville", "NC");
        assert_eq!(variants[0], "Interstate 95 mile 12A, Fayetteville, NC");
    }

    #[test]
    fn interstate_without_exit_falls_through() {
        let variants = address_variants("Interstate Highway, Rest Area", "Gallup", "NM");
        assert_eq!(variants, vec!["Gallup, NM"]);
    }

    #[test]
    fn state_route() {
        let variants = address_variants("SR-30 & Main St", "Tooele", "UT");
        assert_eq!(variants, vec!["State Route 30, Tooele, UT", "Tooele, UT"]);
    }

    #[test]
    fn us_route_with_space() {
        let variants = address_variants("US 287 N", "Amarillo", "TX");
        assert_eq!(variants, vec!["US Route 287, Amarillo, TX", "Amarillo, TX"]);
    }

    #[test]
    fn leftmost_us_route_wins() {
        let variants = address_variants("US 40 & US-287", "Limon", "CO");
        assert_eq!(variants, vec!["US Route 40, Limon, CO", "Limon, CO"]);
    }

    #[test]
    fn exit_needs_whitespace_before_number() {
        let variants = address_variants("I-80 EXIT-5", "Laramie", "WY");
        assert_eq!(variants, vec!["Laramie, WY"]);
    }

    #[test]
    fn plain_street_address() {
        let variants = address_variants("1200 Main Street", "Casper", "WY");
        assert_eq!(variants, vec!["Casper, WY"]);
    }
}

//! In-memory fuel station index.
//!
//! Stations are loaded once from the price CSV and bucketed into a grid of
//! [`STATION_GRID_CELL_DEGREES`] cells so that proximity queries along a
//! route only touch nearby stations.

pub mod geocode_csv;
pub mod geocoding;
pub mod loader;

use crate::constants::{MILES_PER_DEGREE_LAT, STATION_GRID_CELL_DEGREES};
use crate::error::{AppError, Result};
use crate::models::{Coordinates, FuelStation};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

pub use loader::LoadSummary;

type CellKey = (i32, i32);

#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    stations: Vec<FuelStation>,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl StationIndex {
    /// Load the index from a CSV file on disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|e| {
            AppError::StationData(format!("failed to open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }

    /// Load the index from any CSV reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let (stations, summary) = loader::read_stations(reader)?;

        tracing::info!(
            stations = stations.len(),
            rows = summary.rows,
            missing_coordinates = summary.missing_coordinates,
            invalid = summary.invalid,
            duplicates = summary.duplicates,
            "Loaded {} stations with coordinates ({} rows read)",
            stations.len(),
            summary.rows
        );

        Ok(Self::new(stations))
    }

    pub fn new(stations: Vec<FuelStation>) -> Self {
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (idx, station) in stations.iter().enumerate() {
            cells
                .entry(cell_of(&station.coordinates))
                .or_default()
                .push(idx);
        }

        StationIndex { stations, cells }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&FuelStation> {
        self.stations.get(idx)
    }

    /// All stations within `radius_miles` of `point`
    /// Returns (station index, distance_miles) pairs in no particular order
    pub fn stations_near(&self, point: &Coordinates, radius_miles: f64) -> Vec<(usize, f64)> {
        let (lat_cell, lon_cell) = cell_of(point);
        let (lat_rings, lon_rings) = search_rings(point.lat, radius_miles);

        let mut found = Vec::new();
        for dlat in -lat_rings..=lat_rings {
            for dlon in -lon_rings..=lon_rings {
                let Some(indices) = self.cells.get(&(lat_cell + dlat, lon_cell + dlon)) else {
                    continue;
                };
                for &idx in indices {
                    let distance = point.distance_to(&self.stations[idx].coordinates);
                    if distance <= radius_miles {
                        found.push((idx, distance));
                    }
                }
            }
        }
        found
    }
}

fn cell_of(point: &Coordinates) -> CellKey {
    (
        (point.lat / STATION_GRID_CELL_DEGREES).floor() as i32,
        (point.lon / STATION_GRID_CELL_DEGREES).floor() as i32,
    )
}

/// Number of neighbouring cells (per axis) needed to cover `radius_miles`
fn search_rings(lat: f64, radius_miles: f64) -> (i32, i32) {
    let cell_lat_miles = STATION_GRID_CELL_DEGREES * MILES_PER_DEGREE_LAT;
    // Longitude cells shrink towards the poles; clamp so the ring count stays bounded
    let cell_lon_miles = cell_lat_miles * lat.to_radians().cos().max(0.1);

    let lat_rings = (radius_miles / cell_lat_miles).ceil().max(1.0) as i32;
    let lon_rings = (radius_miles / cell_lon_miles).ceil().max(1.0) as i32;
    (lat_rings, lon_rings)
}

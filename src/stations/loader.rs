//! Parsing of the geocoded fuel price CSV.

use crate::error::{AppError, Result};
use crate::models::{Coordinates, FuelStation};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// One row of `fuel_prices_with_coords.csv`
#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(rename = "OPIS Truckstop ID")]
    id: u64,
    #[serde(rename = "Truckstop Name")]
    name: String,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Rack ID", default, deserialize_with = "csv::invalid_option")]
    rack_id: Option<u64>,
    #[serde(rename = "Retail Price")]
    retail_price: f64,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

/// Counters reported after a load
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows: usize,
    pub missing_coordinates: usize,
    pub invalid: usize,
    pub duplicates: usize,
}

/// Read stations from CSV. Rows without coordinates are dropped, rows with
/// unusable values are skipped with a warning, and repeated station ids keep
/// their cheapest price.
pub fn read_stations<R: Read>(reader: R) -> Result<(Vec<FuelStation>, LoadSummary)> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut summary = LoadSummary::default();
    let mut by_id: HashMap<u64, usize> = HashMap::new();
    let mut stations: Vec<FuelStation> = Vec::new();

    for (line, record) in csv_reader.deserialize::<StationRow>().enumerate() {
        summary.rows += 1;

        let row = match record {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping unreadable station row {}: {}", line + 2, e);
                summary.invalid += 1;
                continue;
            }
        };

        let (lat, lon) = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                summary.missing_coordinates += 1;
                continue;
            }
        };

        let coordinates = match Coordinates::new(lat, lon) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Skipping station '{}' (id: {}): {}", row.name, row.id, e);
                summary.invalid += 1;
                continue;
            }
        };

        if !row.retail_price.is_finite() || row.retail_price <= 0.0 {
            tracing::warn!(
                "Skipping station '{}' (id: {}): invalid price {}",
                row.name,
                row.id,
                row.retail_price
            );
            summary.invalid += 1;
            continue;
        }

        let station = FuelStation {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
            state: row.state,
            rack_id: row.rack_id,
            price_per_gallon: row.retail_price,
            coordinates,
        };

        match by_id.get(&station.id) {
            Some(&existing) => {
                summary.duplicates += 1;
                if station.price_per_gallon < stations[existing].price_per_gallon {
                    stations[existing] = station;
                }
            }
            None => {
                by_id.insert(station.id, stations.len());
                stations.push(station);
            }
        }
    }

    if stations.is_empty() {
        return Err(AppError::StationData(format!(
            "no usable stations in {} rows",
            summary.rows
        )));
    }

    Ok((stations, summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price,latitude,longitude\n";

    #[test]
    fn reads_valid_rows() {
        let csv = format!(
            "{}{}{}",
            HEADER,
            "7,WOODSHED OF BIG CABIN,\"I-44, EXIT 283 & US-69\",Big Cabin,OK,307,3.00733333,36.54,-95.22\n",
            "1,TEST STATION NYC,Test Address,New York,NY,1,3.5,40.7128,-74.0060\n"
        );
        let (stations, summary) = read_stations(csv.as_bytes()).unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(summary.rows, 2);
        assert_eq!(stations[0].id, 7);
        assert_eq!(stations[0].address, "I-44, EXIT 283 & US-69");
        assert_eq!(stations[0].rack_id, Some(307));
        assert_eq!(stations[1].coordinates.lat, 40.7128);
    }

    #[test]
    fn drops_rows_without_coordinates() {
        let csv = format!(
            "{}{}{}",
            HEADER,
            "1,A,addr,Tulsa,OK,1,3.1,,\n",
            "2,B,addr,Tulsa,OK,1,3.2,36.1,-95.9\n"
        );
        let (stations, summary) = read_stations(csv.as_bytes()).unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, 2);
        assert_eq!(summary.missing_coordinates, 1);
    }

    #[test]
    fn skips_invalid_price_and_coordinates() {
        let csv = format!(
            "{}{}{}{}",
            HEADER,
            "1,A,addr,Tulsa,OK,1,0,36.1,-95.9\n",
            "2,B,addr,Tulsa,OK,1,3.2,136.1,-95.9\n",
            "3,C,addr,Tulsa,OK,1,3.3,36.1,-95.9\n"
        );
        let (stations, summary) = read_stations(csv.as_bytes()).unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, 3);
        assert_eq!(summary.invalid, 2);
    }

    #[test]
    fn unparsable_rack_id_becomes_none() {
        let csv = format!("{}{}", HEADER, "1,A,addr,Tulsa,OK,n/a,3.1,36.1,-95.9\n");
        let (stations, _) = read_stations(csv.as_bytes()).unwrap();
        assert_eq!(stations[0].rack_id, None);
    }

    #[test]
    fn duplicate_ids_keep_cheapest() {
        let csv = format!(
            "{}{}{}{}",
            HEADER,
            "9,A,addr,Tulsa,OK,1,3.40,36.1,-95.9\n",
            "9,A,addr,Tulsa,OK,1,3.10,36.1,-95.9\n",
            "9,A,addr,Tulsa,OK,1,3.30,36.1,-95.9\n"
        );
        let (stations, summary) = read_stations(csv.as_bytes()).unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].price_per_gallon, 3.10);
        assert_eq!(summary.duplicates, 2);
    }

    #[test]
    fn empty_file_is_an_error() {
        let result = read_stations(HEADER.as_bytes());
        assert!(matches!(result, Err(AppError::StationData(_))));
    }
}

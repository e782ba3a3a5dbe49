//! Fill in missing station coordinates in a price CSV.
//!
//! Rows that already carry a parseable latitude and longitude are left alone.
//! Every other row is geocoded through [`NominatimClient::geocode_station`]
//! and the file is checkpointed to `<output>.partial` as it goes.

use crate::error::{AppError, Result};
use crate::stations::geocoding::NominatimClient;
use csv::StringRecord;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Rows geocoded between checkpoints
pub const SAVE_INTERVAL: usize = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeSummary {
    pub rows: usize,
    pub needed: usize,
    pub found: usize,
    pub failed: usize,
}

impl GeocodeSummary {
    pub fn success_rate(&self) -> f64 {
        let processed = self.found + self.failed;
        if processed > 0 {
            self.found as f64 / processed as f64 * 100.0
        } else {
            100.0
        }
    }
}

/// Column positions the tool reads and writes
#[derive(Debug)]
struct Columns {
    address: usize,
    city: usize,
    state: usize,
    latitude: usize,
    longitude: usize,
}

impl Columns {
    /// Locate the address columns, appending coordinate columns when absent
    fn resolve(headers: &mut StringRecord) -> Result<Self> {
        Ok(Columns {
            address: required_column(headers, "Address")?,
            city: required_column(headers, "City")?,
            state: required_column(headers, "State")?,
            latitude: column_or_append(headers, "latitude"),
            longitude: column_or_append(headers, "longitude"),
        })
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn required_column(headers: &StringRecord, name: &str) -> Result<usize> {
    find_column(headers, name)
        .ok_or_else(|| AppError::StationData(format!("Missing '{}' column", name)))
}

fn column_or_append(headers: &mut StringRecord, name: &str) -> usize {
    find_column(headers, name).unwrap_or_else(|| {
        headers.push_field(name);
        headers.len() - 1
    })
}

/// Extend `record` with empty fields up to `width`
fn pad_to(mut record: StringRecord, width: usize) -> StringRecord {
    while record.len() < width {
        record.push_field("");
    }
    record
}

/// Rebuild a record with `value` at `idx`
fn set_field(record: &StringRecord, idx: usize, value: &str) -> StringRecord {
    record
        .iter()
        .enumerate()
        .map(|(i, field)| if i == idx { value } else { field })
        .collect()
}

fn has_coordinates(record: &StringRecord, columns: &Columns) -> bool {
    let present = |idx: usize| {
        record
            .get(idx)
            .map(|v| v.trim().parse::<f64>().is_ok())
            .unwrap_or(false)
    };
    present(columns.latitude) && present(columns.longitude)
}

fn write_csv(path: &Path, headers: &StringRecord, records: &[StringRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(headers)?;
    for record in records {
        writer.write_record(record)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::StationData(format!("failed to write {}: {}", path.display(), e)))
}

pub fn partial_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

/// Geocode every row of `input` missing coordinates and write the result to `output`
pub async fn geocode_csv(
    input: &Path,
    output: &Path,
    client: &NominatimClient,
    delay: Duration,
) -> Result<GeocodeSummary> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(input)?;
    let mut headers = reader.headers()?.clone();
    let columns = Columns::resolve(&mut headers)?;

    let width = headers.len();
    let mut records = Vec::new();
    for record in reader.records() {
        records.push(pad_to(record?, width));
    }

    let partial = partial_path(output);
    let mut summary = GeocodeSummary {
        rows: records.len(),
        needed: records
            .iter()
            .filter(|r| !has_coordinates(r, &columns))
            .count(),
        ..GeocodeSummary::default()
    };

    tracing::info!(
        rows = summary.rows,
        needed = summary.needed,
        "Geocoding {} of {} rows from {}",
        summary.needed,
        summary.rows,
        input.display()
    );

    for i in 0..records.len() {
        if has_coordinates(&records[i], &columns) {
            continue;
        }

        let field = |idx: usize| records[i].get(idx).unwrap_or("").trim().to_string();
        let (address, city, state) = (
            field(columns.address),
            field(columns.city),
            field(columns.state),
        );

        match client.geocode_station(&address, &city, &state, delay).await {
            Some(coords) => {
                let updated = set_field(&records[i], columns.latitude, &coords.lat.to_string());
                records[i] = set_field(&updated, columns.longitude, &coords.lon.to_string());
                summary.found += 1;
            }
            None => summary.failed += 1,
        }

        let processed = summary.found + summary.failed;
        if processed % SAVE_INTERVAL == 0 {
            write_csv(&partial, &headers, &records)?;
            tracing::info!(
                "{}/{} geocoded ({} found, {} failed), progress saved to {}",
                processed,
                summary.needed,
                summary.found,
                summary.failed,
                partial.display()
            );
        }
    }

    write_csv(output, &headers, &records)?;
    if partial.exists() {
        fs::remove_file(&partial).map_err(|e| {
            AppError::StationData(format!("failed to remove {}: {}", partial.display(), e))
        })?;
    }

    Ok(summary)
}

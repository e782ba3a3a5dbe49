//! CLI tool that adds latitude/longitude columns to the raw fuel price CSV.
//!
//! ```text
//! cargo run --bin geocode_stations -- \
//!     --input=fuel-prices-for-be-assessment.csv \
//!     --output=fuel_prices_with_coords.csv
//! ```
//!
//! Nominatim allows one request per second for bulk use; raise `--delay-ms`
//! when geocoding the full file against the public endpoint.

use fuelroute::stations::geocode_csv::{geocode_csv, partial_path, SAVE_INTERVAL};
use fuelroute::stations::geocoding::{NominatimClient, NOMINATIM_SEARCH_URL};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use std::{env, fs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DELAY_MS: u64 = 200;

fn print_help() {
    eprintln!(
        "\
Usage: geocode_stations [OPTIONS]

Geocode truck stop addresses and write a CSV with latitude/longitude columns.
Progress is saved to <output>.partial every {} rows.

Options:
  --input=PATH       Raw fuel price CSV (required)
  --output=PATH      Output CSV path (required)
  --delay-ms=N       Pause before each geocoding request (default: {})
  --base-url=URL     Nominatim search endpoint (default: {})
  --help             Show this help message",
        SAVE_INTERVAL, DEFAULT_DELAY_MS, NOMINATIM_SEARCH_URL
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fuelroute=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        return Ok(());
    }

    let input = args
        .iter()
        .find_map(|a| a.strip_prefix("--input="))
        .map(PathBuf::from)
        .ok_or("Missing --input=PATH argument")?;

    let output = args
        .iter()
        .find_map(|a| a.strip_prefix("--output="))
        .map(PathBuf::from)
        .ok_or("Missing --output=PATH argument")?;

    let delay_ms: u64 = match args.iter().find_map(|a| a.strip_prefix("--delay-ms=")) {
        Some(value) => value
            .parse()
            .map_err(|_| format!("Invalid --delay-ms value: {}", value))?,
        None => DEFAULT_DELAY_MS,
    };

    let client = match args.iter().find_map(|a| a.strip_prefix("--base-url=")) {
        Some(url) => NominatimClient::with_base_url(url.to_string()),
        None => NominatimClient::new(),
    };

    if !input.exists() {
        return Err(format!("Input file does not exist: {}", input.display()).into());
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    eprintln!("Reading CSV: {}", input.display());
    eprintln!("Output CSV:  {}", output.display());
    eprintln!("Checkpoint:  {}", partial_path(&output).display());
    eprintln!();

    let t_total = Instant::now();
    let summary = geocode_csv(&input, &output, &client, Duration::from_millis(delay_ms)).await?;

    eprintln!();
    eprintln!(
        "Done in {:.1}s: {} rows, {} needed coordinates, {} geocoded, {} failed ({:.1}% success)",
        t_total.elapsed().as_secs_f64(),
        summary.rows,
        summary.needed,
        summary.found,
        summary.failed,
        summary.success_rate()
    );
    eprintln!("Wrote {}", output.display());

    Ok(())
}

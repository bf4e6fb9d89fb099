// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Headless track derivation
//!
//! Loads a flight log in CSV format, runs the full derivation pipeline and
//! logs a summary of the derived track.

use clap::Parser;
use common::raw::{LegacyRecord, ModernRecord, RawRecord};
use common::sample::Sample;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use track::{GroundReference, Track};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a flight log in CSV format
    #[arg(short, long)]
    input: String,
    /// Parse the legacy firmware schema instead of the modern one
    #[arg(short, long)]
    legacy: bool,
    /// Subtract the wind vector from horizontal position and velocity
    #[arg(short, long)]
    wind_adjustment: bool,
    /// Wind east component (m/s)
    #[arg(long, default_value_t = 0.0)]
    wind_east: f64,
    /// Wind north component (m/s)
    #[arg(long, default_value_t = 0.0)]
    wind_north: f64,
    /// Vehicle mass (kg)
    #[arg(long, default_value_t = 90.0)]
    mass: f64,
    /// Wing planform area (m^2)
    #[arg(long, default_value_t = 2.0)]
    planform_area: f64,
    /// Manual ground altitude in meters MSL; taken from the last fix when omitted
    #[arg(long)]
    ground: Option<f64>,
}

fn read_records(path: &str, legacy: bool) -> Result<Vec<RawRecord>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    if legacy {
        for row in reader.deserialize::<LegacyRecord>() {
            match row {
                Ok(record) => records.push(RawRecord::Legacy(record)),
                Err(e) => warn!("Skipping unparsable row. Error: {e}"),
            }
        }
    } else {
        // modern logs carry a units row right below the header, which shows
        // up here as one skipped row
        for row in reader.deserialize::<ModernRecord>() {
            match row {
                Ok(record) => records.push(RawRecord::Modern(record)),
                Err(e) => warn!("Skipping unparsable row. Error: {e}"),
            }
        }
    }
    Ok(records)
}

fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let records = read_records(&cli.input, cli.legacy).map_err(|e| {
        error!("Failed to read {}. Error: {}", cli.input, e);
    })?;

    let mut track = Track::new();
    track.options.wind_adjustment = cli.wind_adjustment;
    track.options.wind_e = cli.wind_east;
    track.options.wind_n = cli.wind_north;
    track.options.mass = cli.mass;
    track.options.planform_area = cli.planform_area;
    match cli.ground {
        Some(ground) => {
            track.options.ground_reference = GroundReference::Manual;
            track.options.fixed_reference = ground;
        }
        None => track.options.ground_reference = GroundReference::Automatic,
    }

    track.import(&records).map_err(|e| {
        error!("Failed to import {}. Error: {e}", cli.input);
    })?;
    track.derive_all().map_err(|e| {
        error!("Failed to derive the track. Error: {e}");
    })?;

    let samples = track.samples();
    let duration = samples[samples.len() - 1].t;
    let peak_speed = samples
        .iter()
        .map(Sample::total_speed)
        .fold(f64::NAN, f64::max);
    let lowest = samples.iter().map(|s| s.z).fold(f64::NAN, f64::min);
    let polar = track.get_wind_speed_direction();

    info!("Loaded {} samples covering {:.1} s", samples.len(), duration);
    if let Some(ground) = track.ground() {
        info!("Ground reference: {:.1} m MSL", ground);
    }
    info!(
        "Wind: {:.1} m/s from {:.0} degrees",
        polar.speed, polar.direction
    );
    info!("Peak total speed: {:.1} m/s", peak_speed);
    info!("Lowest height above ground: {:.1} m", lowest);
    Ok(())
}

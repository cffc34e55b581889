use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use framing::{FeatureCollection, FramingConfig, GeoJson};
use serde::Serialize;
use tools::{extent_report, format_region_report, region_counts, simulate_flight};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Camera framing utilities for GeoJSON")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the bounding box, corners and bounding sphere of a GeoJSON file
    Extent {
        path: PathBuf,
    },

    /// Fly a simulated camera to a GeoJSON file and print where it lands
    Fly {
        path: PathBuf,

        /// JSON framing config; missing fields use defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Heading in degrees
        #[arg(long)]
        heading: Option<f64>,

        /// Pitch in degrees
        #[arg(long, allow_negative_numbers = true)]
        pitch: Option<f64>,

        /// Multiplier on the framed sphere radius
        #[arg(long)]
        scale: Option<f64>,

        /// Flight duration in seconds
        #[arg(long)]
        duration: Option<f64>,

        /// Simulated frames per second
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
    },

    /// Count features per value of a property
    CountRegions {
        path: PathBuf,

        #[arg(long, default_value = "region")]
        property: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    match Args::parse().command {
        Command::Extent { path } => {
            let features = read_geojson(&path)?;
            print_json(&extent_report(&features))
        }
        Command::Fly {
            path,
            config,
            heading,
            pitch,
            scale,
            duration,
            fps,
        } => {
            let features = read_geojson(&path)?;
            let mut config = match config {
                Some(p) => FramingConfig::load(&p).map_err(|e| e.to_string())?,
                None => FramingConfig::default(),
            };
            let t = &mut config.transition;
            t.heading_deg = heading.unwrap_or(t.heading_deg);
            t.pitch_deg = pitch.unwrap_or(t.pitch_deg);
            t.scale = scale.unwrap_or(t.scale);
            t.duration_s = duration.unwrap_or(t.duration_s);

            let report = simulate_flight(&features, &config, fps);
            if !report.arrived {
                tracing::warn!(path = %path.display(), "camera did not reach the features");
            }
            print_json(&report)
        }
        Command::CountRegions { path, property } => {
            let payload = read_file(&path)?;
            let collection = FeatureCollection::from_geojson_str(&payload)
                .map_err(|e| format!("parse {path:?}: {e}"))?;
            let counts = region_counts(&collection, &property);
            let report = format_region_report(&counts).map_err(|e| format!("serialize: {e}"))?;
            print!("{report}");
            Ok(())
        }
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))
}

fn read_geojson(path: &Path) -> Result<GeoJson, String> {
    let payload = read_file(path)?;
    GeoJson::from_geojson_str(&payload).map_err(|e| format!("parse {path:?}: {e}"))
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("serialize: {e}"))?;
    println!("{text}");
    Ok(())
}

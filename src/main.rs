use std::path::PathBuf;

use campus_geojson::{overlay_bounds, process_files, Coordinate, LoadError, OverlayIndex};
use clap::{Arg, Command};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn parse_lat_lon(input: &str) -> Result<Coordinate, LoadError> {
    let invalid = || LoadError::InvalidCoordinate(input.to_string());
    let (lat, lon) = input.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    Coordinate::from_lon_lat(lon, lat).ok_or_else(invalid)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = Command::new("Campus GeoJSON")
        .version("0.1")
        .about("Extracts drawable campus map overlays from GeoJSON features")
        .arg(
            Arg::new("files")
                .short('f')
                .long("files")
                .num_args(1..)
                .required(true)
                .help("Input GeoJSON files"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .num_args(1)
                .help("Directory to write the extracted overlays to (optional)"),
        )
        .arg(
            Arg::new("locate")
                .long("locate")
                .num_args(1)
                .allow_hyphen_values(true)
                .help("List overlays containing this \"lat,lon\" coordinate"),
        )
        .get_matches();

    let files: Vec<PathBuf> = matches
        .get_many::<String>("files")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();
    let output_dir = matches.get_one::<String>("output").map(PathBuf::from);

    let locate = match matches.get_one::<String>("locate").map(|s| parse_lat_lon(s)) {
        Some(Ok(coordinate)) => Some(coordinate),
        Some(Err(e)) => {
            error!("{}", e);
            std::process::exit(1);
        }
        None => None,
    };

    for file in &files {
        if !file.exists() {
            error!("File not found: {}", file.display());
            std::process::exit(1);
        }
    }

    let overlays = match process_files(&files, output_dir.as_deref()) {
        Ok(overlays) => overlays,
        Err(e) => {
            error!("Error processing files: {}", e);
            std::process::exit(1);
        }
    };

    info!("Extracted {} overlays from {} files", overlays.len(), files.len());
    if let Some(bbox) = overlay_bounds(&overlays) {
        info!(
            "Extent: ({:.6}, {:.6}) to ({:.6}, {:.6})",
            bbox.min().y,
            bbox.min().x,
            bbox.max().y,
            bbox.max().x
        );
    }

    if let Some(at) = locate {
        let index = OverlayIndex::new(overlays);
        let hits = index.overlays_at(at);
        info!("{} overlays contain ({}, {})", hits.len(), at.latitude(), at.longitude());
        for overlay in hits {
            println!("{}", overlay.title.as_deref().unwrap_or("(untitled)"));
        }
    }
}

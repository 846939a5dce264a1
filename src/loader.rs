use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::overlay::{collect_overlays, MapOverlay};

/// Reads a GeoJSON file into an untyped JSON tree. Shape is not checked here.
pub fn load_document(file_path: &Path) -> Result<Value> {
    info!("Loading file: {}", file_path.display());
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_overlays(file_path: &Path) -> Result<Vec<MapOverlay>> {
    let document = load_document(file_path)?;
    let overlays = collect_overlays(&document);
    info!("Loaded {} overlays from {}", overlays.len(), file_path.display());
    Ok(overlays)
}

use std::path::{Path, PathBuf};

pub mod coordinates;
pub mod error;
pub mod export;
pub mod feature;
pub mod loader;
pub mod node;
pub mod overlay;

pub use coordinates::{parse_coordinates, parse_ring, Coordinate, CoordinateSequence, GeometryKind};
pub use error::{LoadError, Result};
pub use feature::{extract_title, has_valid_geometry};
pub use node::NodeExt;
pub use overlay::{collect_overlays, overlay_bounds, MapOverlay, OverlayIndex};

/// Loads every file, writing `<stem>_overlays.geojson` into `output_dir` when given.
pub fn process_files(files: &[PathBuf], output_dir: Option<&Path>) -> Result<Vec<MapOverlay>> {
    let mut all_overlays = Vec::new();
    for file in files {
        let overlays = loader::load_overlays(file)?;
        if let Some(dir) = output_dir {
            std::fs::create_dir_all(dir)?;
            let file_stem = file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown");
            let output_path = dir.join(format!("{}_overlays.geojson", file_stem));
            export::write_overlays(&overlays, &output_path)?;
        }
        all_overlays.extend(overlays);
    }
    Ok(all_overlays)
}

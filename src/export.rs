use std::fs::File;
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry as GeoJsonGeometry};
use serde_json::Map;
use tracing::info;

use crate::coordinates::{Coordinate, GeometryKind};
use crate::error::Result;
use crate::overlay::MapOverlay;

fn position(c: &Coordinate) -> Vec<f64> {
    vec![c.longitude(), c.latitude()]
}

/// Writes overlays back out as GeoJSON, swapping points back to `[lon, lat]`.
///
/// Area overlays become single-ring Polygons holding exactly the extracted
/// exterior ring. The ring is not closed or otherwise repaired.
pub fn overlays_to_collection(overlays: &[MapOverlay]) -> FeatureCollection {
    let features: Vec<Feature> = overlays
        .iter()
        .filter_map(|overlay| {
            let value = match overlay.kind {
                GeometryKind::Point => geojson::Value::Point(position(overlay.points.first()?)),
                GeometryKind::Polygon | GeometryKind::MultiPolygon => {
                    geojson::Value::Polygon(vec![overlay.points.iter().map(position).collect()])
                }
                GeometryKind::Other => return None,
            };

            let mut properties = Map::new();
            if let Some(title) = &overlay.title {
                properties.insert("title".to_string(), title.clone().into());
            }

            Some(Feature {
                bbox: None,
                geometry: Some(GeoJsonGeometry::new(value)),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn write_overlays(overlays: &[MapOverlay], output_path: &Path) -> Result<()> {
    let collection = overlays_to_collection(overlays);
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &collection)?;
    info!(
        "Written {} overlays to {}",
        collection.features.len(),
        output_path.display()
    );
    Ok(())
}

use geo::{BoundingRect, Contains, Coord, Point, Polygon, Rect};
use rstar::{RTree, RTreeObject, AABB};
use serde_json::Value;
use tracing::debug;

use crate::coordinates::{
    parse_coordinates, to_line_string, Coordinate, CoordinateSequence, GeometryKind,
};
use crate::feature::{extract_title, has_valid_geometry};
use crate::node::NodeExt;

/// One feature ready to draw: its title, what kind of shape it is and its points.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOverlay {
    pub title: Option<String>,
    pub kind: GeometryKind,
    pub points: CoordinateSequence,
}

impl MapOverlay {
    /// Validates and extracts a single feature. `None` when nothing would be drawn.
    pub fn from_feature(feature: &Value) -> Option<MapOverlay> {
        if !has_valid_geometry(feature) {
            return None;
        }
        let geometry = feature.field("geometry");
        let points = parse_coordinates(geometry);
        if points.is_empty() {
            return None;
        }
        Some(MapOverlay {
            title: extract_title(feature).map(str::to_owned),
            kind: geometry.map(GeometryKind::of).unwrap_or(GeometryKind::Other),
            points,
        })
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        to_line_string(&self.points).bounding_rect()
    }

    /// Exterior ring as a `geo` polygon, for area overlays only.
    pub fn polygon(&self) -> Option<Polygon<f64>> {
        if self.kind.is_area() {
            Some(Polygon::new(to_line_string(&self.points), vec![]))
        } else {
            None
        }
    }
}

/// Extracts every drawable overlay from a FeatureCollection or a single Feature.
/// Features that fail validation or yield no points are skipped.
pub fn collect_overlays(document: &Value) -> Vec<MapOverlay> {
    let features: Vec<&Value> = match document.field_str("type") {
        "FeatureCollection" => document
            .field_array("features")
            .map(|features| features.iter().collect())
            .unwrap_or_default(),
        "Feature" => vec![document],
        other => {
            debug!("Document type {:?} carries no features", other);
            Vec::new()
        }
    };

    let total_features = features.len();
    let mut overlays = Vec::with_capacity(total_features);
    for (position, feature) in features.into_iter().enumerate() {
        match MapOverlay::from_feature(feature) {
            Some(overlay) => overlays.push(overlay),
            None => debug!("Skipping feature {}: no drawable geometry", position),
        }
    }
    debug!("Extracted {} overlays from {} features", overlays.len(), total_features);
    overlays
}

/// Combined extent of all overlays, e.g. to fit the camera to the campus.
pub fn overlay_bounds(overlays: &[MapOverlay]) -> Option<Rect<f64>> {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    let mut found = false;

    for bbox in overlays.iter().filter_map(MapOverlay::bounds) {
        min_x = min_x.min(bbox.min().x);
        min_y = min_y.min(bbox.min().y);
        max_x = max_x.max(bbox.max().x);
        max_y = max_y.max(bbox.max().y);
        found = true;
    }

    found.then(|| Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y }))
}

struct IndexedArea {
    position: usize,
    polygon: Polygon<f64>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedArea {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial lookup of area overlays, for answering "what did the user tap".
pub struct OverlayIndex {
    overlays: Vec<MapOverlay>,
    areas: RTree<IndexedArea>,
}

impl OverlayIndex {
    pub fn new(overlays: Vec<MapOverlay>) -> Self {
        let areas = overlays
            .iter()
            .enumerate()
            .filter_map(|(position, overlay)| {
                let polygon = overlay.polygon()?;
                let bbox = polygon.bounding_rect()?;
                Some(IndexedArea {
                    position,
                    polygon,
                    envelope: AABB::from_corners(
                        [bbox.min().x, bbox.min().y],
                        [bbox.max().x, bbox.max().y],
                    ),
                })
            })
            .collect();

        OverlayIndex {
            overlays,
            areas: RTree::bulk_load(areas),
        }
    }

    pub fn overlays(&self) -> &[MapOverlay] {
        &self.overlays
    }

    pub fn area_count(&self) -> usize {
        self.areas.size()
    }

    /// Area overlays whose exterior ring contains `at`, in input order.
    /// Points on the boundary are not contained.
    pub fn overlays_at(&self, at: Coordinate) -> Vec<&MapOverlay> {
        let point = Point::from(Coord::from(at));
        let mut hits: Vec<usize> = self
            .areas
            .locate_in_envelope_intersecting(&AABB::from_point([point.x(), point.y()]))
            .filter(|area| area.polygon.contains(&point))
            .map(|area| area.position)
            .collect();
        hits.sort_unstable();
        hits.into_iter().map(|position| &self.overlays[position]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(title: &str, lon: f64, lat: f64, size: f64) -> Value {
        json!({
            "type": "Feature",
            "properties": {"title": title},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [lon, lat],
                    [lon + size, lat],
                    [lon + size, lat + size],
                    [lon, lat + size],
                    [lon, lat]
                ]]
            }
        })
    }

    fn campus() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                square("Library", 0.0, 0.0, 2.0),
                square("Reading Room", 0.5, 0.5, 1.0),
                {"type": "Feature", "properties": {"title": "Gate"},
                 "geometry": {"type": "Point", "coordinates": [5.0, 6.0]}},
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[]]}},
                {"type": "Feature",
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}},
                {"type": "Feature", "properties": {"title": "Ghost"}},
                square("Gym", 10.0, 10.0, 1.0)
            ]
        })
    }

    #[test]
    fn test_collect_overlays_skips_undrawable_features() {
        let overlays = collect_overlays(&campus());
        let titles: Vec<_> = overlays.iter().map(|o| o.title.as_deref()).collect();
        assert_eq!(
            titles,
            vec![Some("Library"), Some("Reading Room"), Some("Gate"), Some("Gym")]
        );
        assert_eq!(overlays[2].kind, GeometryKind::Point);
        assert_eq!(overlays[2].points, vec![Coordinate::new(6.0, 5.0).unwrap()]);
        assert_eq!(overlays[0].points.len(), 5);
    }

    #[test]
    fn test_collect_overlays_accepts_single_feature() {
        let overlays = collect_overlays(&square("Library", 0.0, 0.0, 1.0));
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].kind, GeometryKind::Polygon);
    }

    #[test]
    fn test_collect_overlays_on_other_documents() {
        assert!(collect_overlays(&json!({"type": "Point", "coordinates": [1, 2]})).is_empty());
        assert!(collect_overlays(&json!({"type": "FeatureCollection"})).is_empty());
        assert!(collect_overlays(&Value::Null).is_empty());
    }

    #[test]
    fn test_overlay_without_title() {
        let feature = json!({"geometry": {"type": "Point", "coordinates": [1, 2]}});
        let overlay = MapOverlay::from_feature(&feature).unwrap();
        assert_eq!(overlay.title, None);
        assert!(overlay.polygon().is_none());
    }

    #[test]
    fn test_overlay_bounds() {
        let overlays = collect_overlays(&campus());
        let bbox = overlay_bounds(&overlays).unwrap();
        assert_eq!((bbox.min().x, bbox.min().y), (0.0, 0.0));
        assert_eq!((bbox.max().x, bbox.max().y), (11.0, 11.0));
        assert!(overlay_bounds(&[]).is_none());
    }

    #[test]
    fn test_overlay_bounds_stay_finite_with_non_numeric_entries() {
        let feature = json!({
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, "NaN"], [1, 1], ["inf", 2], [0, 1], [null, 0]]]
            }
        });
        let document = json!({"type": "FeatureCollection", "features": [feature]});
        let overlays = collect_overlays(&document);
        assert_eq!(overlays[0].points.len(), 2);
        let bbox = overlay_bounds(&overlays).unwrap();
        assert_eq!((bbox.min().x, bbox.min().y), (0.0, 1.0));
        assert_eq!((bbox.max().x, bbox.max().y), (1.0, 1.0));
    }

    #[test]
    fn test_overlays_at_returns_nested_areas_in_order() {
        let index = OverlayIndex::new(collect_overlays(&campus()));
        assert_eq!(index.area_count(), 3);
        assert_eq!(index.overlays().len(), 4);

        let hits: Vec<_> = index
            .overlays_at(Coordinate::new(1.0, 1.0).unwrap())
            .into_iter()
            .filter_map(|o| o.title.as_deref())
            .collect();
        assert_eq!(hits, vec!["Library", "Reading Room"]);

        let hits: Vec<_> = index
            .overlays_at(Coordinate::new(0.25, 1.75).unwrap())
            .into_iter()
            .filter_map(|o| o.title.as_deref())
            .collect();
        assert_eq!(hits, vec!["Library"]);
    }

    #[test]
    fn test_overlays_at_misses() {
        let index = OverlayIndex::new(collect_overlays(&campus()));
        assert!(index.overlays_at(Coordinate::new(6.0, 5.0).unwrap()).is_empty());
        assert!(index.overlays_at(Coordinate::new(-1.0, -1.0).unwrap()).is_empty());
        let empty = OverlayIndex::new(Vec::new());
        assert!(empty.overlays_at(Coordinate::new(0.0, 0.0).unwrap()).is_empty());
    }
}

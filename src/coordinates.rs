use geo::{Coord, LineString};
use serde_json::Value;

use crate::node::{number_in, NodeExt};

/// A latitude/longitude pair ready for a map overlay. Both components are finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

pub type CoordinateSequence = Vec<Coordinate>;

impl Coordinate {
    /// Returns `None` unless both components are finite.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Coordinate { latitude, longitude })
        } else {
            None
        }
    }

    /// Builds a coordinate from GeoJSON axis order `[lon, lat]`.
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> Option<Self> {
        Coordinate::new(latitude, longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(c: Coordinate) -> Self {
        Coord {
            x: c.longitude,
            y: c.latitude,
        }
    }
}

/// The geometry types this parser understands. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Polygon,
    MultiPolygon,
    Other,
}

impl GeometryKind {
    /// Exact, case-sensitive match on the GeoJSON `type` tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Point" => GeometryKind::Point,
            "Polygon" => GeometryKind::Polygon,
            "MultiPolygon" => GeometryKind::MultiPolygon,
            _ => GeometryKind::Other,
        }
    }

    pub fn of(geometry: &Value) -> Self {
        GeometryKind::from_tag(geometry.field_str("type"))
    }

    pub fn is_area(self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }
}

/// Converts a geometry node into renderable coordinates.
///
/// Never fails: a missing geometry, an unknown type or malformed coordinates
/// all come back as an empty sequence. Only the exterior ring is read for
/// polygons, and only the first polygon's exterior ring for multipolygons.
pub fn parse_coordinates(geometry: Option<&Value>) -> CoordinateSequence {
    let Some(geometry) = geometry else {
        return Vec::new();
    };
    let Some(coords) = geometry.field_array("coordinates") else {
        return Vec::new();
    };

    match GeometryKind::of(geometry) {
        GeometryKind::Point => parse_point(coords),
        GeometryKind::Polygon => coords.first().map(parse_ring).unwrap_or_default(),
        GeometryKind::MultiPolygon => coords
            .first()
            .and_then(|polygon| polygon.as_array())
            .and_then(|rings| rings.first())
            .map(parse_ring)
            .unwrap_or_default(),
        GeometryKind::Other => Vec::new(),
    }
}

fn parse_point(position: &[Value]) -> CoordinateSequence {
    lon_lat(position).into_iter().collect()
}

/// Parses one linear ring, skipping entries that aren't usable `[lon, lat]` pairs.
/// Order of the surviving entries is kept.
pub fn parse_ring(ring: &Value) -> CoordinateSequence {
    match ring.as_array() {
        Some(entries) => entries.iter().filter_map(lon_lat_entry).collect(),
        None => Vec::new(),
    }
}

fn lon_lat_entry(entry: &Value) -> Option<Coordinate> {
    entry.as_array().and_then(|position| lon_lat(position))
}

// Anything past the first two entries (altitude) is ignored.
fn lon_lat(position: &[Value]) -> Option<Coordinate> {
    Coordinate::from_lon_lat(number_in(position, 0), number_in(position, 1))
}

pub fn to_line_string(points: &[Coordinate]) -> LineString<f64> {
    LineString::new(points.iter().copied().map(Coord::from).collect())
}

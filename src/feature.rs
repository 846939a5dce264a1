use serde_json::Value;

use crate::node::NodeExt;

/// Structural check on a feature's geometry: it exists, carries a non-empty
/// `type` and a non-empty `coordinates` array.
///
/// This does not promise that [`parse_coordinates`](crate::parse_coordinates)
/// yields any points. `{"type":"Polygon","coordinates":[[]]}` passes here and
/// still extracts to nothing.
pub fn has_valid_geometry(feature: &Value) -> bool {
    let Some(geometry) = feature.field("geometry").filter(|g| g.is_object()) else {
        return false;
    };
    !geometry.field_str("type").is_empty()
        && geometry
            .field_array("coordinates")
            .is_some_and(|coords| !coords.is_empty())
}

/// Display title from `properties.title`, returned as-is.
pub fn extract_title(feature: &Value) -> Option<&str> {
    feature
        .field_object("properties")
        .and_then(|props| props.get("title"))
        .and_then(Value::as_str)
        .filter(|title| !title.is_empty())
}

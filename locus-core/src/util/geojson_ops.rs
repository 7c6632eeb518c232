use super::GeometryError;
use geo::{Geometry, MultiPolygon};

/// encodes a ring as a GeoJSON MultiPolygon geometry. empty rings encode as a
/// MultiPolygon with no members rather than a null geometry.
pub fn multipolygon_to_geojson(geometry: &MultiPolygon<f64>) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::from(geometry))
}

/// decodes a GeoJSON geometry into a (possibly single-member) MultiPolygon.
///
/// # Arguments
///
/// * `geometry` - GeoJSON geometry, expected to be a Polygon or MultiPolygon
///
/// # Returns
///
/// * the polygonal area, or an error for any other geometry type
pub fn geojson_to_multipolygon(
    geometry: geojson::Geometry,
) -> Result<MultiPolygon<f64>, GeometryError> {
    let decoded: Geometry<f64> = geometry
        .try_into()
        .map_err(|e: geojson::Error| GeometryError::Decode(e.to_string()))?;
    match decoded {
        Geometry::Polygon(p) => Ok(MultiPolygon::new(vec![p])),
        Geometry::MultiPolygon(mp) => Ok(mp),
        other => Err(GeometryError::NotPolygonal(
            geometry_type_name(&other).to_string(),
        )),
    }
}

fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

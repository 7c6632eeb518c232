#[derive(thiserror::Error, Debug)]
pub enum GeometryError {
    #[error("failure decoding GeoJSON geometry to geo-types: {0}")]
    Decode(String),
    #[error("expected a Polygon or MultiPolygon geometry, found {0}")]
    NotPolygonal(String),
}

use serde::{Deserialize, Serialize};

/// a resolved [longitude, latitude] pair in WGS84 degrees.
/// serializes as a two-element array, matching GeoJSON position order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Coordinate {
        Coordinate { lon, lat }
    }

    /// rounds each ordinate to a fixed number of decimal places and scales
    /// it to an integer so the pair can be hashed and compared exactly.
    pub fn rounded_key(&self, decimal_places: u32) -> (i64, i64) {
        let scale = 10f64.powi(decimal_places as i32);
        let lon = (self.lon * scale).round() as i64;
        let lat = (self.lat * scale).round() as i64;
        (lon, lat)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(value: [f64; 2]) -> Self {
        let [lon, lat] = value;
        Coordinate { lon, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lon, value.lat]
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lon, self.lat)
    }
}

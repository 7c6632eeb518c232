use crate::util::geojson_ops;
use geo::MultiPolygon;
use serde_json::{Map, Number, Value};

/// one reachability ring annotated with the constraint that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct LocusFeature {
    pub ring: MultiPolygon<f64>,
    pub address: String,
    pub mode: String,
    pub time: Number,
    pub uncertainty: Number,
    pub color: String,
}

impl LocusFeature {
    pub fn properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert(String::from("address"), Value::from(self.address.clone()));
        properties.insert(String::from("mode"), Value::from(self.mode.clone()));
        properties.insert(String::from("time"), Value::Number(self.time.clone()));
        properties.insert(String::from("uncertainty"), Value::Number(self.uncertainty.clone()));
        properties.insert(String::from("color"), Value::from(self.color.clone()));
        properties
    }

    pub fn to_geojson(&self) -> geojson::Feature {
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson_ops::multipolygon_to_geojson(&self.ring)),
            id: None,
            properties: Some(self.properties()),
            foreign_members: None,
        }
    }
}

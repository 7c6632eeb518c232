use super::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// echo of a caller's constraint record with its geocoded position attached.
/// every field of the input object is kept verbatim, including ones the
/// aggregator itself ignores.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ResolvedConstraint {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub coordinates: Coordinate,
}

impl ResolvedConstraint {
    pub fn new(raw: &Value, coordinates: Coordinate) -> ResolvedConstraint {
        let mut fields = raw.as_object().cloned().unwrap_or_default();
        // the resolved position always wins over anything the caller sent
        fields.remove("coordinates");
        ResolvedConstraint {
            fields,
            coordinates,
        }
    }
}

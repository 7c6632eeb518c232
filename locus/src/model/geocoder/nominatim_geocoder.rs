use super::{Geocode, Geocoder, GeocoderError};
use crate::model::throttle::Throttle;
use async_trait::async_trait;
use locus_core::model::Coordinate;
use serde_json::Value;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// geocoder backed by a Nominatim `/search` endpoint. every request, including
/// failed ones, takes a permit from the throttle first so the service's
/// fair-use limit holds across the whole process.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    throttle: Throttle,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, base_url: &str, throttle: Throttle) -> NominatimGeocoder {
        NominatimGeocoder {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            throttle,
        }
    }

    /// looks up `address` and returns the position of the first match.
    pub async fn search(&self, address: &str) -> Result<Coordinate, GeocoderError> {
        self.throttle.acquire().await;
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", address),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocoderError::Status(status.as_u16()));
        }
        let places: Vec<Value> = response
            .json()
            .await
            .map_err(|e| GeocoderError::Malformed(e.to_string()))?;
        let first = places.first().ok_or(GeocoderError::NoMatch)?;
        let lon = ordinate(first, "lon")?;
        let lat = ordinate(first, "lat")?;
        Ok(Coordinate::new(lon, lat))
    }
}

/// Nominatim encodes ordinates as strings; plain numbers are accepted too.
fn ordinate(place: &Value, field: &str) -> Result<f64, GeocoderError> {
    let value = place
        .get(field)
        .ok_or_else(|| GeocoderError::Malformed(format!("match has no '{field}' field")))?;
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| GeocoderError::Malformed(format!("'{field}' is not a number: {value}")))
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> Geocode {
        match self.search(address).await {
            Ok(coordinate) => Geocode::Found(coordinate),
            Err(e) => {
                log::error!("Geocoding failed for address {address}, {e}");
                Geocode::NotFound
            }
        }
    }
}

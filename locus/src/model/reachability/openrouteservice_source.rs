use super::{IsochroneSource, ReachabilityError};
use async_trait::async_trait;
use geo::MultiPolygon;
use locus_core::model::Coordinate;
use locus_core::util::geojson_ops;
use serde_json::{json, Value};

pub const DEFAULT_OPENROUTESERVICE_URL: &str = "https://api.openrouteservice.org";

/// isochrones from the OpenRouteService v2 API. each call requests a single
/// time range and keeps only the geometry of the first returned feature.
pub struct OpenRouteServiceSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenRouteServiceSource {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
    ) -> OpenRouteServiceSource {
        OpenRouteServiceSource {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn request_body(origin: &Coordinate, minutes: u32) -> Value {
        let seconds = u64::from(minutes) * 60;
        json!({
            "locations": [[origin.lon, origin.lat]],
            "range": [seconds],
            "range_type": "time",
        })
    }
}

#[async_trait]
impl IsochroneSource for OpenRouteServiceSource {
    async fn isochrone(
        &self,
        origin: Coordinate,
        mode: &str,
        minutes: u32,
    ) -> Result<MultiPolygon<f64>, ReachabilityError> {
        let url = format!("{}/v2/isochrones/{mode}", self.base_url);
        let body = Self::request_body(&origin, minutes);
        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header(reqwest::header::AUTHORIZATION, api_key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReachabilityError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let text = response.text().await?;
        let geojson = text
            .parse::<geojson::GeoJson>()
            .map_err(|e| ReachabilityError::Malformed(e.to_string()))?;
        let collection = match geojson {
            geojson::GeoJson::FeatureCollection(fc) => Ok(fc),
            _ => Err(ReachabilityError::Malformed(String::from(
                "expected a FeatureCollection",
            ))),
        }?;
        let feature = collection
            .features
            .into_iter()
            .next()
            .ok_or(ReachabilityError::NoFeatures)?;
        let geometry = feature.geometry.ok_or_else(|| {
            ReachabilityError::Malformed(String::from("first feature has no geometry"))
        })?;
        let polygon = geojson_ops::geojson_to_multipolygon(geometry)?;
        Ok(polygon)
    }
}

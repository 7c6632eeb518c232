use super::nominatim_geocoder::DEFAULT_NOMINATIM_URL;
use super::{GeocoderError, NominatimGeocoder};
use crate::model::clock::Clock;
use crate::model::throttle::Throttle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "find/1.0";
pub const DEFAULT_MIN_INTERVAL_MILLIS: u64 = 1000;
pub const DEFAULT_GEOCODER_TIMEOUT_SECONDS: u64 = 10;

/// Serializable configuration for the geocoding service.
/// Builds to a [`NominatimGeocoder`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocoderConfig {
    // geocoding service root. defaults to the public Nominatim instance
    pub base_url: Option<String>,
    // User-Agent header, required by the Nominatim usage policy. defaults to "find/1.0"
    pub user_agent: Option<String>,
    // minimum spacing between requests. defaults to 1000ms
    pub min_interval_millis: Option<u64>,
    // per-request timeout. defaults to 10 seconds
    pub timeout_seconds: Option<u64>,
}

impl GeocoderConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(
            self.min_interval_millis
                .unwrap_or(DEFAULT_MIN_INTERVAL_MILLIS),
        )
    }

    pub fn build(&self, clock: Arc<dyn Clock>) -> Result<NominatimGeocoder, GeocoderError> {
        let timeout = Duration::from_secs(
            self.timeout_seconds
                .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECONDS),
        );
        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeocoderError::Build(e.to_string()))?;
        let throttle = Throttle::new(clock, self.min_interval());
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_NOMINATIM_URL);
        Ok(NominatimGeocoder::new(client, base_url, throttle))
    }
}

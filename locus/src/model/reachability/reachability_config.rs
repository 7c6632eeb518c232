use super::openrouteservice_source::DEFAULT_OPENROUTESERVICE_URL;
use super::reachability_cache::DEFAULT_CACHE_TTL;
use super::reachability_client::DEFAULT_COORDINATE_PRECISION;
use super::{OpenRouteServiceSource, ReachabilityCache, ReachabilityClient, ReachabilityError};
use crate::model::clock::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_KEY_ENV: &str = "ORS_API_KEY";
pub const DEFAULT_REACHABILITY_TIMEOUT_SECONDS: u64 = 30;

/// Serializable configuration for the isochrone service and its cache.
/// Builds to a [`ReachabilityClient`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReachabilityConfig {
    // isochrone service root. defaults to the public OpenRouteService API
    pub base_url: Option<String>,
    // literal API key. takes precedence over `api_key_env`
    pub api_key: Option<String>,
    // environment variable holding the API key. defaults to ORS_API_KEY
    pub api_key_env: Option<String>,
    // per-request timeout. defaults to 30 seconds
    pub timeout_seconds: Option<u64>,
    // lifetime of cached isochrones. defaults to one hour
    pub cache_ttl_seconds: Option<u64>,
    // decimal places kept when rounding origins into cache keys. defaults to 6
    pub coordinate_precision: Option<u32>,
}

impl ReachabilityConfig {
    pub fn api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| {
            let var = self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
            std::env::var(var).ok()
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CACHE_TTL)
    }

    pub fn build(&self, clock: Arc<dyn Clock>) -> Result<ReachabilityClient, ReachabilityError> {
        let timeout = Duration::from_secs(
            self.timeout_seconds
                .unwrap_or(DEFAULT_REACHABILITY_TIMEOUT_SECONDS),
        );
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReachabilityError::Build(e.to_string()))?;
        let api_key = self.api_key();
        if api_key.is_none() {
            log::warn!("no isochrone service API key configured, requests are sent unauthenticated");
        }
        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENROUTESERVICE_URL);
        let source = OpenRouteServiceSource::new(client, base_url, api_key);
        let cache = ReachabilityCache::new(self.cache_ttl(), clock);
        Ok(ReachabilityClient::new(
            Arc::new(source),
            cache,
            self.coordinate_precision
                .unwrap_or(DEFAULT_COORDINATE_PRECISION),
        ))
    }
}

use super::LocusAppError;
use crate::model::aggregator::LocusAggregator;
use crate::model::clock::Clock;
use crate::model::geocoder::GeocoderConfig;
use crate::model::reachability::ReachabilityConfig;
use config::{Config, Environment, File, FileFormat};
use locus_core::util::ColorPalette;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_MODE: &str = "driving-car";
pub const ENV_PREFIX: &str = "LOCUS";

/// top-level application configuration. every section is optional; an empty
/// file (or no file) runs against the public Nominatim and OpenRouteService
/// endpoints with the default palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocusAppConfig {
    // travel profile for constraints that do not name one
    #[serde(default = "default_mode")]
    pub default_mode: String,
    // color tokens assigned to rings round-robin
    #[serde(default)]
    pub palette: Option<Vec<String>>,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub reachability: ReachabilityConfig,
}

fn default_mode() -> String {
    String::from(DEFAULT_MODE)
}

impl Default for LocusAppConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            palette: None,
            geocoder: GeocoderConfig::default(),
            reachability: ReachabilityConfig::default(),
        }
    }
}

impl LocusAppConfig {
    /// reads configuration from an optional TOML file, then applies
    /// `LOCUS__SECTION__KEY` environment overrides.
    pub fn from_file(path: Option<&Path>) -> Result<LocusAppConfig, LocusAppError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                let source = path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| String::from("environment"));
                LocusAppError::InvalidConfiguration(format!("{source} produced error: {e}"))
            })?;
        config
            .try_deserialize::<LocusAppConfig>()
            .map_err(|e| LocusAppError::InvalidConfiguration(e.to_string()))
    }

    pub fn from_toml_str(toml: &str) -> Result<LocusAppConfig, LocusAppError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize::<LocusAppConfig>())
            .map_err(|e| LocusAppError::InvalidConfiguration(e.to_string()))
    }

    pub fn palette(&self) -> Result<ColorPalette, LocusAppError> {
        match &self.palette {
            None => Ok(ColorPalette::default()),
            Some(colors) => {
                ColorPalette::new(colors.clone()).map_err(LocusAppError::InvalidConfiguration)
            }
        }
    }

    /// wires up the geocoder, reachability client and aggregator. the clock is
    /// shared by the geocoder throttle and the isochrone cache.
    pub fn build(&self, clock: Arc<dyn Clock>) -> Result<LocusAggregator, LocusAppError> {
        let palette = self.palette()?;
        let geocoder = self.geocoder.build(clock.clone())?;
        let reachability = self.reachability.build(clock)?;
        Ok(LocusAggregator::new(
            Arc::new(geocoder),
            Arc::new(reachability),
            palette,
            &self.default_mode,
        ))
    }
}

mod geocode;
mod geocoder_config;
mod geocoder_error;
mod nominatim_geocoder;

pub use geocode::{Geocode, Geocoder};
pub use geocoder_config::GeocoderConfig;
pub use geocoder_error::GeocoderError;
pub use nominatim_geocoder::NominatimGeocoder;

#[derive(thiserror::Error, Debug)]
pub enum GeocoderError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geocoding service responded with status {0}")]
    Status(u16),
    #[error("geocoding response is malformed: {0}")]
    Malformed(String),
    #[error("no match for address")]
    NoMatch,
    #[error("failure building geocoder: {0}")]
    Build(String),
}

use async_trait::async_trait;
use locus_core::model::Coordinate;

/// result of resolving an address. a lookup that failed for any reason,
/// including transport errors, is `NotFound`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geocode {
    Found(Coordinate),
    NotFound,
}

impl Geocode {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Geocode::Found(coordinate) => Some(*coordinate),
            Geocode::NotFound => None,
        }
    }
}

/// resolves free-text addresses to a single position, taking the first match.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Geocode;
}

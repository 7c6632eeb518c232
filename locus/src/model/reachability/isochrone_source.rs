use super::ReachabilityError;
use async_trait::async_trait;
use geo::MultiPolygon;
use locus_core::model::Coordinate;

/// an upstream service that draws a single travel-time isochrone.
#[async_trait]
pub trait IsochroneSource: Send + Sync {
    /// area reachable from `origin` within `minutes` minutes travelling by `mode`.
    async fn isochrone(
        &self,
        origin: Coordinate,
        mode: &str,
        minutes: u32,
    ) -> Result<MultiPolygon<f64>, ReachabilityError>;
}

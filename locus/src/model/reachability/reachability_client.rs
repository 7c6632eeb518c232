use super::{IsochroneSource, ReachabilityCache, ReachabilityCacheKey};
use geo::MultiPolygon;
use locus_core::model::Coordinate;
use std::sync::Arc;

pub const DEFAULT_COORDINATE_PRECISION: u32 = 6;

/// cached access to an [`IsochroneSource`]. upstream failures are logged and
/// reported as `None`; they never reach the caller as errors.
pub struct ReachabilityClient {
    source: Arc<dyn IsochroneSource>,
    cache: ReachabilityCache,
    coordinate_precision: u32,
}

impl ReachabilityClient {
    pub fn new(
        source: Arc<dyn IsochroneSource>,
        cache: ReachabilityCache,
        coordinate_precision: u32,
    ) -> ReachabilityClient {
        ReachabilityClient {
            source,
            cache,
            coordinate_precision,
        }
    }

    pub fn cache(&self) -> &ReachabilityCache {
        &self.cache
    }

    /// isochrone for `minutes` minutes of travel by `mode` from `origin`, or
    /// `None` if it could not be generated.
    pub async fn fetch(
        &self,
        origin: Coordinate,
        mode: &str,
        minutes: u32,
    ) -> Option<Arc<MultiPolygon<f64>>> {
        let key = ReachabilityCacheKey::new(&origin, mode, minutes, self.coordinate_precision);
        let result = self
            .cache
            .get_or_fetch(key, || self.source.isochrone(origin, mode, minutes))
            .await;
        match result {
            Ok(polygon) => Some(polygon),
            Err(e) => {
                log::error!("Isochrone generation error for {mode} {minutes}min at {origin}: {e}");
                None
            }
        }
    }
}

/// rounds a travel time to the whole minutes used by cache keys and upstream
/// requests. negative or non-finite times become zero.
pub fn whole_minutes(time: f64) -> u32 {
    if time.is_finite() && time > 0.0 {
        time.round() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod test {
    use super::{whole_minutes, ReachabilityClient};
    use crate::model::clock::ManualClock;
    use crate::model::reachability::{IsochroneSource, ReachabilityCache, ReachabilityError};
    use async_trait::async_trait;
    use geo::{polygon, MultiPolygon};
    use locus_core::model::Coordinate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// fails the first `failures` calls, then succeeds.
    struct FlakySource {
        calls: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl IsochroneSource for FlakySource {
        async fn isochrone(
            &self,
            _origin: Coordinate,
            _mode: &str,
            minutes: u32,
        ) -> Result<MultiPolygon<f64>, ReachabilityError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(ReachabilityError::Status {
                    status: 503,
                    body: String::from("unavailable"),
                });
            }
            let r = f64::from(minutes);
            Ok(MultiPolygon::new(vec![polygon![
                (x: -r, y: -r),
                (x: r, y: -r),
                (x: r, y: r),
                (x: -r, y: r),
            ]]))
        }
    }

    fn client(failures: usize) -> (ReachabilityClient, Arc<FlakySource>) {
        let source = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
            failures,
        });
        let cache = ReachabilityCache::new(Duration::from_secs(3600), Arc::new(ManualClock::new()));
        (ReachabilityClient::new(source.clone(), cache, 6), source)
    }

    #[tokio::test]
    async fn test_shared_time_budget_fetched_once() {
        let (client, source) = client(0);
        let origin = Coordinate::new(-105.2, 39.75);
        // time 10 +/- 2 and time 14 +/- 2 both need the 12 minute isochrone
        client.fetch(origin, "foot-walking", 12).await.expect("outer of first");
        client.fetch(origin, "foot-walking", 12).await.expect("inner of second");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nearby_origins_share_entry() {
        let (client, source) = client(0);
        client
            .fetch(Coordinate::new(-105.2000001, 39.75), "driving-car", 10)
            .await
            .expect("fetch");
        client
            .fetch(Coordinate::new(-105.2000002, 39.75), "driving-car", 10)
            .await
            .expect("fetch");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mode_is_part_of_key() {
        let (client, source) = client(0);
        let origin = Coordinate::new(-105.2, 39.75);
        client.fetch(origin, "driving-car", 10).await.expect("fetch");
        client.fetch(origin, "foot-walking", 10).await.expect("fetch");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_absent_and_retried() {
        let (client, source) = client(1);
        let origin = Coordinate::new(-105.2, 39.75);
        assert!(client.fetch(origin, "driving-car", 10).await.is_none());
        assert!(client.fetch(origin, "driving-car", 10).await.is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_whole_minutes() {
        assert_eq!(whole_minutes(12.0), 12);
        assert_eq!(whole_minutes(7.5), 8);
        assert_eq!(whole_minutes(7.49), 7);
        assert_eq!(whole_minutes(-3.0), 0);
        assert_eq!(whole_minutes(f64::NAN), 0);
    }
}

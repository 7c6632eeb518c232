use super::{ConstraintState, LocatedConstraint};
use crate::model::geocoder::{Geocode, Geocoder};
use crate::model::reachability::ReachabilityClient;
use futures::future::join_all;
use geo::MultiPolygon;
use itertools::Itertools;
use locus_core::model::{
    Constraint, ConstraintError, LocusFeature, LocusOutcome, LocusRequestError,
    ResolvedConstraint,
};
use locus_core::util::{ring_ops, ColorPalette};
use serde_json::Value;
use std::sync::Arc;

type IsochronePair = (Option<Arc<MultiPolygon<f64>>>, Option<Arc<MultiPolygon<f64>>>);

/// turns a list of constraints into annotated reachability rings.
///
/// constraints are validated and geocoded one at a time in input order (the
/// geocoder is rate limited). the outer and inner isochrones of every located
/// constraint are then fetched concurrently; duplicate requests collapse in
/// the reachability cache. a failing constraint is reported and skipped
/// without affecting the others.
pub struct LocusAggregator {
    geocoder: Arc<dyn Geocoder>,
    reachability: Arc<ReachabilityClient>,
    palette: ColorPalette,
    default_mode: String,
}

impl LocusAggregator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        reachability: Arc<ReachabilityClient>,
        palette: ColorPalette,
        default_mode: &str,
    ) -> LocusAggregator {
        LocusAggregator {
            geocoder,
            reachability,
            palette,
            default_mode: default_mode.to_string(),
        }
    }

    pub fn reachability(&self) -> &ReachabilityClient {
        &self.reachability
    }

    /// runs an aggregation from a raw request body of the form
    /// `{"constraints": [...]}`.
    pub async fn aggregate_request(&self, body: &str) -> LocusOutcome {
        match serde_json::from_str::<Value>(body) {
            Ok(payload) => self.aggregate_payload(&payload).await,
            Err(e) => {
                log::warn!("rejecting request body that is not JSON: {e}");
                LocusOutcome::Rejected(LocusRequestError::NotJson)
            }
        }
    }

    pub async fn aggregate_payload(&self, payload: &Value) -> LocusOutcome {
        let Some(object) = payload.as_object() else {
            return LocusOutcome::Rejected(LocusRequestError::NotJson);
        };
        match object.get("constraints") {
            None | Some(Value::Null) => LocusOutcome::Rejected(LocusRequestError::NoConstraints),
            Some(Value::Array(constraints)) => self.aggregate(constraints).await,
            Some(_) => LocusOutcome::Rejected(LocusRequestError::ConstraintsNotAList),
        }
    }

    pub async fn aggregate(&self, constraints: &[Value]) -> LocusOutcome {
        if constraints.is_empty() {
            return LocusOutcome::Rejected(LocusRequestError::NoConstraints);
        }

        let mut states = Vec::with_capacity(constraints.len());
        for raw in constraints {
            states.push(self.locate(raw).await);
        }

        let fetches = states.iter().map(|state| async move {
            match state {
                ConstraintState::Located(located) => Some(self.fetch_isochrones(located).await),
                ConstraintState::Rejected(_) => None,
            }
        });
        let fetched = join_all(fetches).await;

        let mut features: Vec<LocusFeature> = vec![];
        let mut resolved: Vec<ResolvedConstraint> = vec![];
        let mut errors: Vec<ConstraintError> = vec![];
        for (state, isochrones) in states.into_iter().zip_eq(fetched) {
            match (state, isochrones) {
                (ConstraintState::Located(located), Some((Some(outer), inner))) => {
                    let ring = ring_ops::ring(&outer, inner.as_deref());
                    let color = self.palette.color_for_index(features.len()).to_string();
                    resolved.push(ResolvedConstraint::new(&located.raw, located.origin));
                    features.push(LocusFeature {
                        ring,
                        address: located.constraint.address,
                        mode: located.mode,
                        time: located.constraint.time,
                        uncertainty: located.constraint.uncertainty,
                        color,
                    });
                }
                (ConstraintState::Located(located), _) => {
                    let error = ConstraintError::OuterIsochroneFailed(located.constraint.address);
                    log::warn!("{error}");
                    errors.push(error);
                }
                (ConstraintState::Rejected(error), _) => {
                    errors.push(error);
                }
            }
        }

        log::info!(
            "aggregated {} constraints into {} rings with {} errors",
            constraints.len(),
            features.len(),
            errors.len()
        );
        LocusOutcome::classify(features, resolved, errors)
    }

    /// validates a constraint's shape and geocodes its address.
    async fn locate(&self, raw: &Value) -> ConstraintState {
        let constraint = match Constraint::try_from(raw) {
            Ok(constraint) => constraint,
            Err(error) => {
                log::warn!("{error}");
                return ConstraintState::Rejected(error);
            }
        };
        match self.geocoder.resolve(&constraint.address).await {
            Geocode::Found(origin) => {
                let mode = constraint
                    .mode
                    .clone()
                    .unwrap_or_else(|| self.default_mode.clone());
                ConstraintState::Located(LocatedConstraint {
                    raw: raw.clone(),
                    constraint,
                    mode,
                    origin,
                })
            }
            Geocode::NotFound => {
                let error = ConstraintError::AddressNotFound(constraint.address);
                log::warn!("{error}");
                ConstraintState::Rejected(error)
            }
        }
    }

    async fn fetch_isochrones(&self, located: &LocatedConstraint) -> IsochronePair {
        let outer = self.reachability.fetch(
            located.origin,
            &located.mode,
            located.outer_minutes(),
        );
        let inner = self.reachability.fetch(
            located.origin,
            &located.mode,
            located.inner_minutes(),
        );
        futures::join!(outer, inner)
    }
}

#[cfg(test)]
mod test {
    use super::LocusAggregator;
    use crate::model::clock::ManualClock;
    use crate::model::geocoder::{Geocode, Geocoder};
    use crate::model::reachability::{
        IsochroneSource, ReachabilityCache, ReachabilityClient, ReachabilityError,
    };
    use async_trait::async_trait;
    use geo::{polygon, Area, MultiPolygon};
    use locus_core::model::{ConstraintError, Coordinate, LocusOutcome, LocusRequestError};
    use locus_core::util::color_palette::DEFAULT_PALETTE;
    use locus_core::util::ColorPalette;
    use serde_json::{json, Number, Value};
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct MockGeocoder {
        known: HashMap<String, Coordinate>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for MockGeocoder {
        async fn resolve(&self, address: &str) -> Geocode {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.known.get(address) {
                Some(coordinate) => Geocode::Found(*coordinate),
                None => Geocode::NotFound,
            }
        }
    }

    /// draws square isochrones of half-width `minutes / 100` degrees around the
    /// origin. fails for the "broken" mode and for any budget in `failing_minutes`.
    struct MockIsochrones {
        failing_minutes: HashSet<u32>,
        requests: Mutex<Vec<(String, u32)>>,
    }

    impl MockIsochrones {
        fn requests(&self) -> Vec<(String, u32)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IsochroneSource for MockIsochrones {
        async fn isochrone(
            &self,
            origin: Coordinate,
            mode: &str,
            minutes: u32,
        ) -> Result<MultiPolygon<f64>, ReachabilityError> {
            self.requests
                .lock()
                .unwrap()
                .push((mode.to_string(), minutes));
            tokio::task::yield_now().await;
            if mode == "broken" || self.failing_minutes.contains(&minutes) {
                return Err(ReachabilityError::Status {
                    status: 500,
                    body: String::from("internal error"),
                });
            }
            Ok(square(origin, minutes))
        }
    }

    fn square(origin: Coordinate, minutes: u32) -> MultiPolygon<f64> {
        let r = f64::from(minutes) / 100.0;
        let (x, y) = (origin.lon, origin.lat);
        MultiPolygon::new(vec![polygon![
            (x: x - r, y: y - r),
            (x: x + r, y: y - r),
            (x: x + r, y: y + r),
            (x: x - r, y: y + r),
            (x: x - r, y: y - r),
        ]])
    }

    fn golden() -> Coordinate {
        Coordinate::new(-105.2211, 39.7555)
    }

    fn boulder() -> Coordinate {
        Coordinate::new(-105.2705, 40.015)
    }

    struct Harness {
        aggregator: LocusAggregator,
        geocoder: Arc<MockGeocoder>,
        isochrones: Arc<MockIsochrones>,
    }

    fn harness(failing_minutes: &[u32]) -> Harness {
        let known = HashMap::from([
            (String::from("Golden, CO"), golden()),
            (String::from("Boulder, CO"), boulder()),
        ]);
        let geocoder = Arc::new(MockGeocoder {
            known,
            calls: AtomicUsize::new(0),
        });
        let isochrones = Arc::new(MockIsochrones {
            failing_minutes: failing_minutes.iter().copied().collect(),
            requests: Mutex::new(vec![]),
        });
        let cache = ReachabilityCache::new(Duration::from_secs(3600), Arc::new(ManualClock::new()));
        let reachability = Arc::new(ReachabilityClient::new(isochrones.clone(), cache, 6));
        let aggregator = LocusAggregator::new(
            geocoder.clone(),
            reachability,
            ColorPalette::default(),
            "driving-car",
        );
        Harness {
            aggregator,
            geocoder,
            isochrones,
        }
    }

    fn error_messages(outcome: &LocusOutcome) -> Vec<String> {
        match outcome {
            LocusOutcome::Partial { errors, .. } => errors.iter().map(ToString::to_string).collect(),
            _ => vec![],
        }
    }

    #[tokio::test]
    async fn test_all_constraints_succeed_with_cycling_colors() {
        let h = harness(&[]);
        let constraints: Vec<Value> = (0..12)
            .map(|i| {
                let address = if i % 2 == 0 { "Golden, CO" } else { "Boulder, CO" };
                json!({"address": address, "mode": "foot-walking", "time": 10 + i, "uncertainty": 1})
            })
            .collect();
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.status_code(), 200);
        let LocusOutcome::Complete {
            features,
            constraints: resolved,
        } = outcome
        else {
            panic!("expected complete outcome");
        };
        assert_eq!(features.len(), 12);
        assert_eq!(resolved.len(), 12);
        for (i, feature) in features.iter().enumerate() {
            assert_eq!(feature.color, DEFAULT_PALETTE[i % 10]);
            assert_eq!(feature.time, Number::from(10 + i as u64));
        }
        assert_eq!(resolved[1].coordinates, boulder());
    }

    #[tokio::test]
    async fn test_failed_inner_leaves_outer_unchanged() {
        let h = harness(&[8]);
        let constraints = vec![json!({"address": "Golden, CO", "mode": "foot-walking"})];
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.status_code(), 200);
        assert_eq!(outcome.features()[0].ring, square(golden(), 12));
    }

    #[tokio::test]
    async fn test_zero_uncertainty_yields_empty_ring() {
        let h = harness(&[]);
        let constraints = vec![json!({"address": "Golden, CO", "mode": "foot-walking", "time": 15, "uncertainty": 0})];
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.status_code(), 200);
        assert!(outcome.features()[0].ring.unsigned_area() < 1e-12);
        assert_eq!(h.isochrones.requests(), vec![(String::from("foot-walking"), 15)]);
    }

    #[tokio::test]
    async fn test_ring_excludes_inner_isochrone() {
        let h = harness(&[]);
        let constraints = vec![json!({"address": "Golden, CO", "mode": "foot-walking", "time": 10, "uncertainty": 2})];
        let outcome = h.aggregator.aggregate(&constraints).await;
        // (0.24^2) - (0.16^2)
        let expected = 0.0576 - 0.0256;
        assert!((outcome.features()[0].ring.unsigned_area() - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_shared_time_budget_fetched_once() {
        let h = harness(&[]);
        let constraints = vec![
            json!({"address": "Golden, CO", "mode": "foot-walking", "time": 10, "uncertainty": 2}),
            json!({"address": "Golden, CO", "mode": "foot-walking", "time": 14, "uncertainty": 2}),
        ];
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.status_code(), 200);
        let requests = h.isochrones.requests();
        let twelve = requests.iter().filter(|(_, m)| *m == 12).count();
        assert_eq!(twelve, 1);
        assert_eq!(requests.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_shape_with_valid_constraint_is_partial() {
        let h = harness(&[]);
        let constraints = vec![
            json!({"mode": "foot-walking", "time": 5}),
            json!({"address": "Golden, CO", "mode": "foot-walking"}),
        ];
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.status_code(), 207);
        let messages = error_messages(&outcome);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Invalid constraint format: "));
        assert_eq!(outcome.features().len(), 1);
        // rejected constraints do not consume a color
        assert_eq!(outcome.features()[0].color, DEFAULT_PALETTE[0]);
        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_list_rejected_without_upstream_calls() {
        let h = harness(&[]);
        let outcome = h.aggregator.aggregate(&[]).await;
        assert_eq!(
            outcome,
            LocusOutcome::Rejected(LocusRequestError::NoConstraints)
        );
        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 0);
        assert!(h.isochrones.requests().is_empty());
    }

    #[tokio::test]
    async fn test_all_addresses_unknown_reported_as_partial() {
        let h = harness(&[]);
        let constraints = vec![
            json!({"address": "Atlantis", "mode": "foot-walking"}),
            json!({"address": "El Dorado", "mode": "foot-walking"}),
        ];
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.status_code(), 207);
        assert_eq!(
            error_messages(&outcome),
            vec![
                String::from("Address not found: Atlantis"),
                String::from("Address not found: El Dorado"),
            ]
        );
        assert!(outcome.features().is_empty());
        let json = outcome.to_json().expect("serialize");
        assert_eq!(json["constraints"], json!([]));
        assert_eq!(json["features"], json!([]));
        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 2);
        assert!(h.isochrones.requests().is_empty());
    }

    #[tokio::test]
    async fn test_errors_reported_in_input_order() {
        let h = harness(&[]);
        let constraints = vec![
            json!({"address": "Golden, CO", "mode": "broken"}),
            json!({"address": "Atlantis", "mode": "foot-walking"}),
            json!({"address": "Boulder, CO", "mode": "foot-walking"}),
        ];
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.status_code(), 207);
        assert_eq!(
            error_messages(&outcome),
            vec![
                ConstraintError::OuterIsochroneFailed(String::from("Golden, CO")).to_string(),
                String::from("Address not found: Atlantis"),
            ]
        );
        let LocusOutcome::Partial { constraints, features, .. } = outcome else {
            panic!("expected partial outcome");
        };
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].address, "Boulder, CO");
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].coordinates, boulder());
    }

    #[tokio::test]
    async fn test_outer_failure_ignores_inner() {
        let h = harness(&[12]);
        let constraints = vec![json!({"address": "Golden, CO", "mode": "foot-walking"})];
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.status_code(), 207);
        assert_eq!(
            error_messages(&outcome),
            vec![String::from("Failed to generate outer isochrone for Golden, CO")]
        );
        assert!(outcome.features().is_empty());
    }

    #[tokio::test]
    async fn test_blank_address_not_geocoded() {
        let h = harness(&[]);
        let constraints = vec![
            json!({"address": "  ", "mode": "foot-walking"}),
            json!({"address": "Golden, CO", "mode": "foot-walking"}),
        ];
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.status_code(), 207);
        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_mode_uses_default() {
        let h = harness(&[]);
        let constraints = vec![json!({"address": "Golden, CO"})];
        let outcome = h.aggregator.aggregate(&constraints).await;
        assert_eq!(outcome.features()[0].mode, "driving-car");
        let modes: HashSet<String> = h.isochrones.requests().into_iter().map(|(m, _)| m).collect();
        assert_eq!(modes, HashSet::from([String::from("driving-car")]));
    }

    #[tokio::test]
    async fn test_request_level_rejections() {
        let h = harness(&[]);
        assert_eq!(
            h.aggregator.aggregate_request("constraints=1").await,
            LocusOutcome::Rejected(LocusRequestError::NotJson)
        );
        assert_eq!(
            h.aggregator.aggregate_request("[1, 2]").await,
            LocusOutcome::Rejected(LocusRequestError::NotJson)
        );
        assert_eq!(
            h.aggregator.aggregate_request("{}").await,
            LocusOutcome::Rejected(LocusRequestError::NoConstraints)
        );
        assert_eq!(
            h.aggregator
                .aggregate_request(r#"{"constraints": []}"#)
                .await,
            LocusOutcome::Rejected(LocusRequestError::NoConstraints)
        );
        assert_eq!(
            h.aggregator
                .aggregate_request(r#"{"constraints": {"address": "Golden, CO"}}"#)
                .await,
            LocusOutcome::Rejected(LocusRequestError::ConstraintsNotAList)
        );
        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_request_body_round_trip() {
        let h = harness(&[]);
        let body = r#"{"constraints": [{"address": "Golden, CO", "mode": "cycling-regular", "time": 20, "uncertainty": 5}]}"#;
        let outcome = h.aggregator.aggregate_request(body).await;
        let json = outcome.to_json().expect("serialize");
        assert_eq!(json["type"], json!("FeatureCollection"));
        assert_eq!(
            json["features"][0]["properties"],
            json!({
                "address": "Golden, CO",
                "mode": "cycling-regular",
                "time": 20,
                "uncertainty": 5,
                "color": "#FF5733"
            })
        );
        assert_eq!(
            json["constraints"][0],
            json!({
                "address": "Golden, CO",
                "mode": "cycling-regular",
                "time": 20,
                "uncertainty": 5,
                "coordinates": [-105.2211, 39.7555]
            })
        );
    }
}

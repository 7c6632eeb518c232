use super::{ConstraintError, LocusFeature, LocusRequestError, ResolvedConstraint};
use serde_json::{json, Value};

/// the three-way result of a locus aggregation.
#[derive(Clone, Debug, PartialEq)]
pub enum LocusOutcome {
    /// every constraint produced a ring.
    Complete {
        features: Vec<LocusFeature>,
        constraints: Vec<ResolvedConstraint>,
    },
    /// at least one constraint was dropped. the surviving rings, possibly none,
    /// are returned alongside the reasons.
    Partial {
        errors: Vec<ConstraintError>,
        features: Vec<LocusFeature>,
        constraints: Vec<ResolvedConstraint>,
    },
    /// the request as a whole was unusable.
    Rejected(LocusRequestError),
}

impl LocusOutcome {
    pub const STATUS_OK: u16 = 200;
    pub const STATUS_MULTI_STATUS: u16 = 207;
    pub const STATUS_BAD_REQUEST: u16 = 400;

    /// classifies the collected results of an aggregation run. any recorded
    /// error makes the run a partial failure carrying every error, even when
    /// no ring was produced. a run with neither errors nor rings is rejected.
    pub fn classify(
        features: Vec<LocusFeature>,
        constraints: Vec<ResolvedConstraint>,
        errors: Vec<ConstraintError>,
    ) -> LocusOutcome {
        if !errors.is_empty() {
            if features.is_empty() {
                log::warn!("none of {} constraints produced a ring", errors.len());
            }
            LocusOutcome::Partial {
                errors,
                features,
                constraints,
            }
        } else if features.is_empty() {
            LocusOutcome::Rejected(LocusRequestError::NoValidConstraints)
        } else {
            LocusOutcome::Complete {
                features,
                constraints,
            }
        }
    }

    /// HTTP-style status for transports that want one: 200, 207 or 400.
    pub fn status_code(&self) -> u16 {
        match self {
            LocusOutcome::Complete { .. } => Self::STATUS_OK,
            LocusOutcome::Partial { .. } => Self::STATUS_MULTI_STATUS,
            LocusOutcome::Rejected(_) => Self::STATUS_BAD_REQUEST,
        }
    }

    pub fn features(&self) -> &[LocusFeature] {
        match self {
            LocusOutcome::Complete { features, .. } => features,
            LocusOutcome::Partial { features, .. } => features,
            LocusOutcome::Rejected(_) => &[],
        }
    }

    /// response body for this outcome.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            LocusOutcome::Complete {
                features,
                constraints,
            } => Ok(json!({
                "type": "FeatureCollection",
                "features": features_to_json(features)?,
                "constraints": serde_json::to_value(constraints)?,
            })),
            LocusOutcome::Partial {
                errors,
                features,
                constraints,
            } => {
                let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
                Ok(json!({
                    "error": "Partial failure",
                    "details": details,
                    "constraints": serde_json::to_value(constraints)?,
                    "features": features_to_json(features)?,
                }))
            }
            LocusOutcome::Rejected(e) => Ok(json!({ "error": e.to_string() })),
        }
    }
}

fn features_to_json(features: &[LocusFeature]) -> Result<Value, serde_json::Error> {
    let geojson_features = features
        .iter()
        .map(|f| serde_json::to_value(f.to_geojson()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(geojson_features))
}

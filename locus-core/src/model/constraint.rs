use super::ConstraintError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub const DEFAULT_TIME_MINUTES: u64 = 10;
pub const DEFAULT_UNCERTAINTY_MINUTES: u64 = 2;

/// a single "about `time` minutes away from `address` by `mode`" constraint.
///
/// `mode` is an opaque travel profile (e.g. `driving-car`, `foot-walking`)
/// that is forwarded to the isochrone service without validation. when it is
/// missing, the aggregator substitutes its configured default mode.
///
/// `time` and `uncertainty` keep the caller's JSON numbers so they are echoed
/// back unchanged; arithmetic goes through [`Constraint::time_minutes`] and
/// [`Constraint::uncertainty_minutes`].
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Constraint {
    pub address: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default = "default_time")]
    pub time: Number,
    #[serde(default = "default_uncertainty")]
    pub uncertainty: Number,
}

fn default_time() -> Number {
    Number::from(DEFAULT_TIME_MINUTES)
}

fn default_uncertainty() -> Number {
    Number::from(DEFAULT_UNCERTAINTY_MINUTES)
}

impl Constraint {
    pub fn time_minutes(&self) -> f64 {
        self.time.as_f64().unwrap_or_default()
    }

    pub fn uncertainty_minutes(&self) -> f64 {
        self.uncertainty.as_f64().unwrap_or_default()
    }

    /// travel time budget of the outer ring boundary, `time + uncertainty`, never negative.
    pub fn outer_time(&self) -> f64 {
        (self.time_minutes() + self.uncertainty_minutes()).max(0.0)
    }

    /// travel time budget of the inner ring boundary, `max(0, time - uncertainty)`.
    pub fn inner_time(&self) -> f64 {
        (self.time_minutes() - self.uncertainty_minutes()).max(0.0)
    }
}

impl TryFrom<&Value> for Constraint {
    type Error = ConstraintError;

    /// accepts any JSON object with a non-blank `address`. unknown keys are
    /// ignored here; they are still echoed back through [`super::ResolvedConstraint`].
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let has_address = value
            .as_object()
            .map(|obj| obj.contains_key("address"))
            .unwrap_or(false);
        if !has_address {
            return Err(ConstraintError::InvalidFormat(value.to_string()));
        }
        let constraint: Constraint = serde_json::from_value(value.clone())
            .map_err(|_| ConstraintError::InvalidFormat(value.to_string()))?;
        if constraint.address.trim().is_empty() {
            return Err(ConstraintError::InvalidFormat(value.to_string()));
        }
        Ok(constraint)
    }
}

use crate::model::reachability::whole_minutes;
use locus_core::model::{Constraint, ConstraintError, Coordinate};
use serde_json::Value;

/// where a constraint stopped after shape validation and geocoding.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstraintState {
    Rejected(ConstraintError),
    Located(LocatedConstraint),
}

/// a well-formed constraint with a resolved origin, ready for isochrone fetches.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedConstraint {
    pub raw: Value,
    pub constraint: Constraint,
    pub mode: String,
    pub origin: Coordinate,
}

impl LocatedConstraint {
    pub fn outer_minutes(&self) -> u32 {
        whole_minutes(self.constraint.outer_time())
    }

    pub fn inner_minutes(&self) -> u32 {
        whole_minutes(self.constraint.inner_time())
    }
}

mod constraint;
mod constraint_error;
mod coordinate;
mod locus_feature;
mod locus_outcome;
mod request_error;
mod resolved_constraint;

pub use constraint::{Constraint, DEFAULT_TIME_MINUTES, DEFAULT_UNCERTAINTY_MINUTES};
pub use constraint_error::ConstraintError;
pub use coordinate::Coordinate;
pub use locus_feature::LocusFeature;
pub use locus_outcome::LocusOutcome;
pub use request_error::LocusRequestError;
pub use resolved_constraint::ResolvedConstraint;

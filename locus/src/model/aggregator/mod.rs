mod constraint_state;
mod locus_aggregator;

pub use constraint_state::{ConstraintState, LocatedConstraint};
pub use locus_aggregator::LocusAggregator;

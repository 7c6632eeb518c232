/// reasons a single constraint was dropped from an aggregation. the display
/// text is the message reported back to the caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    #[error("Invalid constraint format: {0}")]
    InvalidFormat(String),
    #[error("Address not found: {0}")]
    AddressNotFound(String),
    #[error("Failed to generate outer isochrone for {0}")]
    OuterIsochroneFailed(String),
}

/// client-input errors. these reject the whole request before (or instead of)
/// producing any geometry.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LocusRequestError {
    #[error("Request must be JSON")]
    NotJson,
    #[error("Constraints must be provided as a list")]
    ConstraintsNotAList,
    #[error("No constraints provided")]
    NoConstraints,
    #[error("No valid constraints processed")]
    NoValidConstraints,
}

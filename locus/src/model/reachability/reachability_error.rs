#[derive(thiserror::Error, Debug)]
pub enum ReachabilityError {
    #[error("isochrone request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("isochrone service responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("isochrone response is malformed: {0}")]
    Malformed(String),
    #[error("isochrone response has no features")]
    NoFeatures,
    #[error("invalid isochrone geometry: {0}")]
    Geometry(#[from] locus_core::util::GeometryError),
    #[error("failure building isochrone client: {0}")]
    Build(String),
}

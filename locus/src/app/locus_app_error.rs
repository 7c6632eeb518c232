use crate::model::{geocoder::GeocoderError, reachability::ReachabilityError};
use locus_core::model::LocusRequestError;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum LocusAppError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Failed to build geocoder: {0}")]
    GeocoderBuild(#[from] GeocoderError),
    #[error("Failed to build reachability client: {0}")]
    ReachabilityBuild(#[from] ReachabilityError),
    #[error("Error reading from '{path}': {message}")]
    ReadError { path: PathBuf, message: String },
    #[error("Error writing to '{path}': {message}")]
    WriteError { path: PathBuf, message: String },
    #[error("Error creating a runtime to handle async code: {0}")]
    TokioError(String),
    #[error("Serializing response failed: {0}")]
    SerializationError(String),
    #[error("Request rejected: {0}")]
    Rejected(LocusRequestError),
}

mod locus_app;
mod locus_app_config;
mod locus_app_error;

pub use locus_app::{LocusApp, LocusOperation};
pub use locus_app_config::LocusAppConfig;
pub use locus_app_error::LocusAppError;

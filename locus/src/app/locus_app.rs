use super::{LocusAppConfig, LocusAppError};
use crate::model::clock::SystemClock;
use clap::{Parser, Subcommand};
use locus_core::model::LocusOutcome;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Command line tool for computing reachability rings from address/travel-time constraints
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct LocusApp {
    #[command(subcommand)]
    pub op: LocusOperation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum LocusOperation {
    /// compute the ring for every constraint in a JSON request file
    Run {
        /// TOML file configuring the geocoder, isochrone service and palette.
        /// if not provided, defaults plus LOCUS__* environment overrides are used.
        #[arg(short, long)]
        configuration_file: Option<String>,

        /// JSON request of the form {"constraints": [{"address": ..., "mode": ..., "time": ..., "uncertainty": ...}]}
        #[arg(short, long)]
        query_file: String,

        /// file to write the response body to. if not provided, write to stdout.
        #[arg(short, long)]
        output_file: Option<String>,

        /// pretty-print the response body
        #[arg(short, long)]
        pretty: bool,
    },
}

impl LocusOperation {
    pub fn run(&self) -> Result<(), LocusAppError> {
        match self {
            LocusOperation::Run {
                configuration_file,
                query_file,
                output_file,
                pretty,
            } => {
                let config_path = configuration_file.as_ref().map(Path::new);
                let config = LocusAppConfig::from_file(config_path)?;
                let query_path = PathBuf::from(query_file);
                let body =
                    std::fs::read_to_string(&query_path).map_err(|e| LocusAppError::ReadError {
                        path: query_path.clone(),
                        message: e.to_string(),
                    })?;

                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| {
                        LocusAppError::TokioError(format!(
                            "failure creating async rust tokio runtime: {e}"
                        ))
                    })?;

                log::info!("computing locus for request '{query_file}'");
                let outcome = runtime.block_on(async {
                    let aggregator = config.build(SystemClock::shared())?;
                    Ok::<_, LocusAppError>(aggregator.aggregate_request(&body).await)
                })?;
                log::info!("locus request finished with status {}", outcome.status_code());

                let response = outcome
                    .to_json()
                    .map_err(|e| LocusAppError::SerializationError(e.to_string()))?;
                let serialized = if *pretty {
                    serde_json::to_string_pretty(&response)
                } else {
                    serde_json::to_string(&response)
                }
                .map_err(|e| LocusAppError::SerializationError(e.to_string()))?;

                match output_file {
                    Some(out) => {
                        let out_path = PathBuf::from(out);
                        std::fs::write(&out_path, serialized).map_err(|e| {
                            LocusAppError::WriteError {
                                path: out_path.clone(),
                                message: e.to_string(),
                            }
                        })?
                    }
                    None => println!("{serialized}"),
                }

                match outcome {
                    LocusOutcome::Rejected(e) => Err(LocusAppError::Rejected(e)),
                    LocusOutcome::Partial { errors, .. } => {
                        log::warn!("{} constraint(s) failed", errors.len());
                        Ok(())
                    }
                    LocusOutcome::Complete { .. } => Ok(()),
                }
            }
        }
    }
}

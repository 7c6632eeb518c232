use clap::Parser;
use locus::app::{LocusApp, LocusAppError};

fn main() -> Result<(), LocusAppError> {
    env_logger::init();
    let args = LocusApp::parse();
    args.op.run()
}

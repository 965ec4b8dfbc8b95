use clap::Parser;

use log::error;
use std::process::ExitCode;

use ssdd2yolo::{visualize_labels, VisualizeArgs};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = VisualizeArgs::parse();

    match visualize_labels(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to visualize labels: {}", e);
            ExitCode::FAILURE
        }
    }
}

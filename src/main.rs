//! Rock-Burst Grade Predictor - Main Entry Point
//!
//! Loads the model once, then answers one JSON request per stdin line.

use std::io::{self, BufRead, Write};

use rockburst_core::api::commands;
use rockburst_core::constants::{APP_NAME, APP_VERSION};
use rockburst_core::logic::model::store;
use rockburst_core::AdapterConfig;

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let config = AdapterConfig::from_env();
    if let Err(e) = store::init(&config) {
        log::error!("Model load failed: {}", e);
        std::process::exit(1);
    }

    let options = config.options();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read request: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = commands::handle_line(&line, &options);
        if writeln!(stdout, "{}", response).and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }

    log::info!("Shutting down ({} inferences)", store::get_status().inference_count);
}

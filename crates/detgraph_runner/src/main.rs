// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless runner for deterministic node graphs.
//!
//! Loads [`RunnerSettings`] from a RON file (first argument, or
//! `detgraph.ron` in the working directory), builds the configured
//! scenario graph, and executes it tick by tick. With `verify_passes`
//! every tick is evaluated twice and the outputs must match bit for bit.
//!
//! `detgraph_runner --defaults` prints the default settings as RON.

mod runner;
mod scenario;
mod settings;

use runner::{RunError, RunReport};
use settings::{RunnerSettings, SETTINGS_FILE_NAME};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("detgraph_runner=info,detgraph=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if std::env::args().nth(1).as_deref() == Some("--defaults") {
        match RunnerSettings::default().to_ron() {
            Ok(text) => println!("{text}"),
            Err(e) => {
                tracing::error!("Failed to serialize defaults: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    tracing::info!("Starting detgraph runner v{}", env!("CARGO_PKG_VERSION"));

    match start() {
        Ok(report) => {
            tracing::info!(ticks = report.ticks, passes = report.passes, "Run complete");
            for (label, value) in &report.probes {
                match &value.text {
                    Some(text) => tracing::info!("{label}: {:?} ({text})", value.data),
                    None => tracing::info!("{label}: {:?}", value.data),
                }
            }
        }
        Err(e) => {
            tracing::error!("Run failed: {e}");
            std::process::exit(1);
        }
    }
}

fn start() -> Result<RunReport, RunError> {
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(SETTINGS_FILE_NAME), PathBuf::from);
    let settings = RunnerSettings::load(&path)?;
    let built = settings.scenario.build();
    runner::run(&settings, built)
}

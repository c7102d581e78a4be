#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, SelfTestConfig};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = SelfTestConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let report = match self_test::run(&config) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("self-test failed: {e:#}");
            return Err(e);
        }
    };

    tracing::info!(
        issued = report.issued,
        min_id = report.min_id,
        max_id = report.max_id,
        elapsed = ?report.elapsed,
        "self-test passed: all IDs unique and strictly increasing"
    );
    Ok(())
}

fn log_startup_info(config: &SelfTestConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting self-test with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting self-test for worker {} with {} thread(s) x {} IDs",
            config.worker_id,
            config.threads,
            config.count
        );
    }
}

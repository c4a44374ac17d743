//! smsoft CLI
//!
//! Lists the software installed across a Meraki Systems Manager network,
//! grouped by app or by device.
//!
//! Exit codes:
//! - 0: report printed
//! - 1: configuration error, or the Dashboard request failed

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use smsoft_client::{DEFAULT_BASE_URL, MerakiClient};
use smsoft_core::config::CONFIG_ENV_VAR;
use smsoft_core::{ConfigError, ConfigFile, Defaults, InventoryCollector, Resolver};
use tracing_subscriber::EnvFilter;

mod cli;
mod progress;

use cli::Args;
use progress::DeviceProgress;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging on stderr so stdout carries only the report
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_file =
        match ConfigFile::load_default(args.config.as_deref(), std::env::var(CONFIG_ENV_VAR).ok()) {
            Ok(file) => file,
            Err(err) => return Ok(config_failure(&err)),
        };

    let defaults = Defaults::compiled().overlay(config_file.defaults());
    let config = match Resolver::from_process_env(defaults).resolve(args.overrides()) {
        Ok(config) => config,
        Err(err) => return Ok(config_failure(&err)),
    };
    tracing::debug!(?config, "resolved configuration");

    let base_url = args
        .base_url
        .or(config_file.defaults.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    narrate(config.quiet, "Connecting to Meraki Dashboard...");
    let client = MerakiClient::with_base_url(&config.credential, &base_url)
        .wrap_err_with(|| format!("cannot create Dashboard client for {base_url}"))?;

    narrate(config.quiet, "Gathering devices...");
    let progress = DeviceProgress::new(config.quiet);
    let report = match InventoryCollector::new(client).run(&config, &progress).await {
        Ok(report) => report,
        Err(err) => {
            progress.abandon();
            return Err(err).wrap_err("inventory collection failed");
        }
    };

    let mut stdout = std::io::stdout().lock();
    report.write_to(&mut stdout, config.quiet)?;
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}

/// Print narration unless quiet
fn narrate(quiet: bool, text: &str) {
    if !quiet {
        println!("{text}");
    }
}

/// Report a configuration problem and pick the exit code
fn config_failure(err: &ConfigError) -> ExitCode {
    tracing::debug!(kind = err.kind(), "configuration failed");
    eprintln!("Error: {err}");
    ExitCode::FAILURE
}

mod config;
mod db;
mod error;
mod ledger;
mod models;
mod remote;
mod run;
mod session;
mod storage;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env().context("Failed to read configuration")?;
    let session = session::Session::open(&config)?;
    run::as_cli(&args, &session)
}

/// Diagnostics go to stderr so command output stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! Syncmerge CLI - reconcile offline-edited records from the command line.
//!
//! Reads a local and a remote JSON record, runs them through the
//! syncmerge-engine and prints the result to stdout. Logs go to stderr.

mod cli;
mod commands;
mod config;
mod error;

use crate::config::Config;
use clap::Parser;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syncmerge=info,syncmerge_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let cli = cli::Cli::parse();
    tracing::debug!(
        timestamp_field = %config.timestamp_field,
        union_fields = ?config.union_fields,
        "configuration loaded"
    );

    let output = commands::run_command(&cli, &config, &mut io::stdin().lock())?;
    println!("{}", output);

    Ok(())
}

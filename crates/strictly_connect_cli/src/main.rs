//! Strictly Connect - command interpreter binary
//!
//! Commands arrive on stdin, replies go to stdout and logs to stderr.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use strictly_connect_cli::{AppConfig, Cli, Dispatcher};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli)?;

    // --log-filter beats RUST_LOG, which beats the config file
    let filter = match &cli.log_filter {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(config.log_filter())?,
        },
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(data_file = %config.data_file().display(), "Starting Strictly Connect");

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let mut dispatcher = Dispatcher::new(stdin, stdout, config.data_file().clone());
    dispatcher.run()?;

    Ok(())
}

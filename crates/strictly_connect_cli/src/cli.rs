//! Command-line interface for strictly_connect.

use std::path::PathBuf;

use clap::Parser;

/// Strictly Connect - line-oriented connection game interpreter
///
/// Reads one command per line from stdin and answers on stdout. An empty
/// line ends the session.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "strictly_connect")]
#[command(about = "Gravity-drop connection game driven by text commands", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File used by the save (G) and load (L) commands
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Tracing filter directive, e.g. "debug" or "strictly_connect=trace"
    #[arg(long)]
    pub log_filter: Option<String>,
}

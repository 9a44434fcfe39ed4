//! Strictly Connect interpreter - text protocol over the game engine
//!
//! Reads one command per line (`RJ`, `IJ`, `CP`, ...) and writes the
//! protocol replies. Configuration comes from flags and an optional TOML
//! file.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod command;
mod config;
mod dispatcher;
mod reply;

// Crate-level exports - Command line
pub use cli::Cli;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError};

// Crate-level exports - Protocol
pub use command::{Arguments, CommandCode};
pub use dispatcher::{DispatchError, Dispatcher};
pub use reply::Reply;

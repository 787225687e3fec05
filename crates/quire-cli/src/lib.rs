//! Quire CLI library.
//!
//! This library provides the core functionality for the Quire command-line interface,
//! including configuration management, input reading, command execution, and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod source;
pub mod transcript;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

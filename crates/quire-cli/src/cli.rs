//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Quire - Split long record files into documents and build a subject profile.
#[derive(Debug, Parser)]
#[command(name = "quire")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "QUIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a file into documents and a subject profile
    Analyze(AnalyzeArgs),

    /// Show how a file would be cut into windows, without calling the model
    Windows(WindowsArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Windowing overrides shared by `analyze` and `windows`.
#[derive(Debug, Clone, Default, Args)]
pub struct WindowingArgs {
    /// Lines per window
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Lines shared by consecutive windows
    #[arg(long)]
    pub overlap: Option<usize>,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// File to analyze
    pub file: PathBuf,

    #[command(flatten)]
    pub windowing: WindowingArgs,

    /// Timeout per model call (seconds)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Append every model call to this file as JSON lines
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Print each document's text below the table
    #[arg(long)]
    pub show_text: bool,
}

/// Arguments for the windows command.
#[derive(Debug, Parser)]
pub struct WindowsArgs {
    /// File to segment
    pub file: PathBuf,

    #[command(flatten)]
    pub windowing: WindowingArgs,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

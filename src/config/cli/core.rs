//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;

/// Agrupar: autoencoder generators and losses for representation learning
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "agrupar")]
#[command(version)]
#[command(about = "Configure, validate and smoke-test autoencoder generators for clustering")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate a configuration file
    Validate(ValidateArgs),

    /// Display information about a configuration
    Info(InfoArgs),

    /// Build the generator a configuration describes and optionally train it on noise
    Build(BuildArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed configuration summary
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the build command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct BuildArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Per-sample input shape, e.g. `3,32,32` for images or `12` for tables
    #[arg(long, value_delimiter = ',', required = true)]
    pub input_shape: Vec<usize>,

    /// Feature-group slice map (JSON or YAML), required for the mixed loss
    #[arg(long)]
    pub feature_groups: Option<PathBuf>,

    /// Training steps to run on uniform noise after building
    #[arg(long, default_value_t = 0)]
    pub steps: usize,

    /// Batch size for the training steps
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

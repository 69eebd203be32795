//! Agrupar CLI
//!
//! Validate generator configurations and smoke-test the generators they describe.
//!
//! # Usage
//!
//! ```bash
//! # Validate config
//! agrupar validate clustering.yaml --detailed
//!
//! # Show config info
//! agrupar info clustering.yaml --format json
//!
//! # Build a VAE for 3x32x32 images and run 20 steps on noise
//! agrupar build clustering.yaml --input-shape 3,32,32 --steps 20
//!
//! # Mixed tabular loss needs a feature-group map
//! agrupar build adult.yaml --input-shape 101 --feature-groups groups.json
//! ```
//!
//! `RUST_LOG` overrides the diagnostic filter chosen from `--verbose` / `--quiet`.

use agrupar::cli::{run_command, Cli, LogLevel};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.verbose, cli.quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.tracing_directive()));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

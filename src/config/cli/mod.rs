//! CLI argument definitions
//!
//! # Usage
//!
//! ```bash
//! agrupar validate config.yaml
//! agrupar info config.yaml --format json
//! agrupar build config.yaml --input-shape 1,28,28 --steps 5
//! agrupar build config.yaml --input-shape 12 --feature-groups groups.yaml
//! ```

mod core;
mod types;

pub use core::{parse_args, BuildArgs, Cli, Command, InfoArgs, ValidateArgs};
pub use types::OutputFormat;

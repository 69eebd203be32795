//! Configuration: YAML schema, loading, validation and CLI arguments

mod cli;
mod loader;
mod schema;
mod validate;

pub use cli::{parse_args, BuildArgs, Cli, Command, InfoArgs, OutputFormat, ValidateArgs};
pub use loader::{load_config, load_feature_groups, parse_config};
pub use schema::{
    ClusterArgs, Config, EncoderArgs, EncoderType, MiscArgs, ReconstructionLoss, VaeStdTform,
};
pub use validate::{validate_config, ValidationError};

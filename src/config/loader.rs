//! Loading configuration and feature-group files

use super::schema::Config;
use super::validate::validate_config;
use crate::data::FeatureGroupSlices;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Parse and validate a YAML configuration string
pub fn parse_config(yaml: &str) -> Result<Config> {
    let cfg: Config = serde_yaml::from_str(yaml)?;
    validate_config(&cfg).map_err(|e| Error::Config(format!("Invalid config: {e}")))?;
    Ok(cfg)
}

/// Load a configuration file
///
/// # Example
///
/// ```no_run
/// use agrupar::config::load_config;
///
/// let cfg = load_config("clustering.yaml")?;
/// println!("recon loss: {}", cfg.enc.recon_loss);
/// # Ok::<(), agrupar::Error>(())
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<Config> {
    let path = config_path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_config(&yaml)
}

/// Load a feature-group slice map; `.json` files are parsed as JSON, anything else as YAML
pub fn load_feature_groups<P: AsRef<Path>>(path: P) -> Result<FeatureGroupSlices> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let slices = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(slices)
}

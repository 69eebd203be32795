//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::Config;

/// Deepest encoder the architectures accept
pub const MAX_LEVELS: usize = 10;

/// Devices the in-crate engine can execute on
const SUPPORTED_DEVICES: &[&str] = &["cpu"];

/// Validate a generator configuration
///
/// Checks:
/// - Optimizer hyperparameters are in range
/// - Loss weights are non-negative
/// - Architecture sizes are non-zero and the depth is bounded
/// - The device is supported
pub fn validate_config(cfg: &Config) -> Result<(), ValidationError> {
    let clust = &cfg.clust;

    if !(clust.enc_lr > 0.0 && clust.enc_lr.is_finite()) {
        return Err(ValidationError::InvalidLearningRate(clust.enc_lr));
    }

    if !(clust.enc_wd >= 0.0) {
        return Err(ValidationError::InvalidWeightDecay(clust.enc_wd));
    }

    for (name, value) in [("vgg_weight", clust.vgg_weight), ("kl_weight", clust.kl_weight)] {
        if !(value >= 0.0 && value.is_finite()) {
            return Err(ValidationError::InvalidLossWeight { name, value });
        }
    }

    if cfg.enc.init_chans == 0 {
        return Err(ValidationError::InvalidInitChans(cfg.enc.init_chans));
    }

    if cfg.enc.levels > MAX_LEVELS {
        return Err(ValidationError::InvalidLevels(cfg.enc.levels));
    }

    if cfg.enc.out_dim == 0 {
        return Err(ValidationError::InvalidOutDim(cfg.enc.out_dim));
    }

    if !SUPPORTED_DEVICES.contains(&cfg.misc.device.as_str()) {
        return Err(ValidationError::UnsupportedDevice(cfg.misc.device.clone()));
    }

    Ok(())
}

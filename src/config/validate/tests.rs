//! Unit tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;

fn create_valid_config() -> Config {
    Config {
        clust: ClusterArgs {
            encoder: EncoderType::Vae,
            kl_weight: 0.5,
            ..Default::default()
        },
        enc: EncoderArgs { recon_loss: ReconstructionLoss::Mixed, ..Default::default() },
        misc: MiscArgs::default(),
    }
}

#[test]
fn test_valid_config() {
    assert!(validate_config(&create_valid_config()).is_ok());
    assert!(validate_config(&Config::default()).is_ok());
}

#[test]
fn test_invalid_learning_rate() {
    let mut cfg = create_valid_config();
    cfg.clust.enc_lr = 0.0;
    let err = validate_config(&cfg).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidLearningRate(0.0)));

    cfg.clust.enc_lr = f32::NAN;
    assert!(matches!(validate_config(&cfg), Err(ValidationError::InvalidLearningRate(_))));
}

#[test]
fn test_negative_weight_decay() {
    let mut cfg = create_valid_config();
    cfg.clust.enc_wd = -0.1;
    assert!(matches!(validate_config(&cfg), Err(ValidationError::InvalidWeightDecay(_))));
}

#[test]
fn test_negative_loss_weights() {
    let mut cfg = create_valid_config();
    cfg.clust.vgg_weight = -1.0;
    let err = validate_config(&cfg).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidLossWeight { name: "vgg_weight", .. }));

    let mut cfg = create_valid_config();
    cfg.clust.kl_weight = f32::INFINITY;
    let err = validate_config(&cfg).unwrap_err();
    assert!(err.to_string().contains("kl_weight"));
}

#[test]
fn test_zero_sizes() {
    let mut cfg = create_valid_config();
    cfg.enc.init_chans = 0;
    assert!(matches!(validate_config(&cfg), Err(ValidationError::InvalidInitChans(0))));

    let mut cfg = create_valid_config();
    cfg.enc.out_dim = 0;
    assert!(matches!(validate_config(&cfg), Err(ValidationError::InvalidOutDim(0))));
}

#[test]
fn test_levels_bounded() {
    let mut cfg = create_valid_config();
    cfg.enc.levels = 10;
    assert!(validate_config(&cfg).is_ok());

    cfg.enc.levels = 64;
    let err = validate_config(&cfg).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidLevels(64)));
    assert_eq!(err.to_string(), "Invalid levels: 64 (must be <= 10)");
}

#[test]
fn test_unsupported_device() {
    let mut cfg = create_valid_config();
    cfg.misc.device = "cuda:0".to_string();
    let err = validate_config(&cfg).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported device: cuda:0 (only cpu is available)");
}

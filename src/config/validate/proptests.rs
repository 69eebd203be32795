//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_config() -> impl Strategy<Value = Config> {
    (
        1e-6f32..1.0,  // enc_lr
        0.0f32..0.1,   // enc_wd
        0.0f32..10.0,  // vgg_weight
        0.0f32..10.0,  // kl_weight
        1usize..128,   // init_chans
        0usize..6,     // levels
        1usize..256,   // out_dim
        prop::sample::select(ReconstructionLoss::ALL.to_vec()),
        prop::bool::ANY,
    )
        .prop_map(
            |(
                enc_lr,
                enc_wd,
                vgg_weight,
                kl_weight,
                init_chans,
                levels,
                out_dim,
                recon_loss,
                vae,
            )| {
                Config {
                    clust: ClusterArgs {
                        encoder: if vae { EncoderType::Vae } else { EncoderType::Ae },
                        vgg_weight,
                        kl_weight,
                        enc_lr,
                        enc_wd,
                        ..Default::default()
                    },
                    enc: EncoderArgs { recon_loss, init_chans, levels, out_dim },
                    misc: MiscArgs::default(),
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_config_passes(cfg in arb_valid_config()) {
        prop_assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn prop_non_positive_lr_fails(cfg in arb_valid_config(), lr in -1.0f32..=0.0) {
        let mut cfg = cfg;
        cfg.clust.enc_lr = lr;
        prop_assert!(matches!(validate_config(&cfg), Err(ValidationError::InvalidLearningRate(_))));
    }

    #[test]
    fn prop_negative_kl_weight_fails(cfg in arb_valid_config(), w in -10.0f32..-1e-6) {
        let mut cfg = cfg;
        cfg.clust.kl_weight = w;
        let is_kl_error = matches!(
            validate_config(&cfg),
            Err(ValidationError::InvalidLossWeight { name: "kl_weight", .. })
        );
        prop_assert!(is_kl_error);
    }
}

//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, Config, ValidateArgs};

/// Format clustering-stage settings as a string
pub fn format_cluster_info(cfg: &Config) -> String {
    let clust = &cfg.clust;
    let mut lines = vec![format!("  Encoder: {}", clust.encoder)];
    if clust.encoder.is_variational() {
        lines.push(format!("  Std transform: {}", clust.vae_std_tform));
    }
    lines.push(format!("  KL weight: {}", clust.kl_weight));
    if clust.vgg_weight != 0.0 {
        lines.push(format!("  VGG weight: {}", clust.vgg_weight));
    }
    lines.join("\n")
}

/// Format encoder architecture and loss as a string
pub fn format_encoder_info(cfg: &Config) -> String {
    let enc = &cfg.enc;
    [
        format!("  Reconstruction loss: {}", enc.recon_loss),
        format!("  Initial channels: {}", enc.init_chans),
        format!("  Levels: {}", enc.levels),
        format!("  Encoding dim: {}", enc.out_dim),
    ]
    .join("\n")
}

/// Format optimizer configuration as a string
pub fn format_optimizer_info(cfg: &Config) -> String {
    let mut lines = vec![
        "  Optimizer: adamw".to_string(),
        format!("  Learning rate: {}", cfg.clust.enc_lr),
    ];
    if cfg.clust.enc_wd > 0.0 {
        lines.push(format!("  Weight decay: {}", cfg.clust.enc_wd));
    }
    lines.join("\n")
}

/// Print detailed configuration summary
pub fn print_detailed_summary(cfg: &Config) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_cluster_info(cfg));
    println!();
    println!("{}", format_encoder_info(cfg));
    println!();
    println!("{}", format_optimizer_info(cfg));
    println!();
    println!("  Device: {}", cfg.misc.device);
    println!("  Seed: {}", cfg.misc.seed);
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, &format!("Validating config: {}", args.config.display()));

    let cfg = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        print_detailed_summary(&cfg);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EncoderType, ReconstructionLoss};

    fn make_test_config() -> Config {
        let mut cfg = Config::default();
        cfg.clust.encoder = EncoderType::Vae;
        cfg.clust.vgg_weight = 0.5;
        cfg.clust.enc_wd = 0.01;
        cfg.enc.recon_loss = ReconstructionLoss::Mixed;
        cfg
    }

    #[test]
    fn test_format_cluster_info() {
        let info = format_cluster_info(&make_test_config());
        assert!(info.contains("vae"));
        assert!(info.contains("Std transform: exp"));
        assert!(info.contains("VGG weight: 0.5"));
    }

    #[test]
    fn test_format_cluster_info_plain_ae() {
        let info = format_cluster_info(&Config::default());
        assert!(info.contains("Encoder: ae"));
        assert!(!info.contains("Std transform"));
        assert!(!info.contains("VGG"));
    }

    #[test]
    fn test_format_encoder_info() {
        let info = format_encoder_info(&make_test_config());
        assert!(info.contains("Reconstruction loss: mixed"));
        assert!(info.contains("Encoding dim: 64"));
    }

    #[test]
    fn test_format_optimizer_info() {
        let info = format_optimizer_info(&make_test_config());
        assert!(info.contains("0.001"));
        assert!(info.contains("Weight decay: 0.01"));
        assert!(!format_optimizer_info(&Config::default()).contains("Weight decay"));
    }
}

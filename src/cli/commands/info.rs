//! Info command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, InfoArgs, OutputFormat};

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let cfg = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "Configuration Info:");
            println!();
            println!("Generator: {}", cfg.clust.encoder);
            println!("Reconstruction loss: {}", cfg.enc.recon_loss);
            println!("Encoding dim: {}", cfg.enc.out_dim);
            println!("Optimizer: adamw (lr={}, wd={})", cfg.clust.enc_lr, cfg.clust.enc_wd);

            if cfg.clust.vgg_weight != 0.0 {
                println!("Perceptual loss: enabled");
            }
            if cfg.clust.kl_weight != 0.0 {
                println!("Prior weight: {}", cfg.clust.kl_weight);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&cfg)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml =
                serde_yaml::to_string(&cfg).map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}

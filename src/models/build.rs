//! Configuration-driven generator factory

use super::arch::{ArchitectureProvider, AutoEncoderParts};
use super::autoencoder::AutoEncoder;
use super::generator::{Generator, GeneratorCore};
use super::vae::Vae;
use crate::config::{Config, ReconstructionLoss};
use crate::data::FeatureGroupSlices;
use crate::error::{Error, Result};
use crate::optim::AdamW;
use crate::train::{
    BCELoss, L1Loss, LossFn, MSELoss, MixedLoss, PixelCrossEntropy, ReconLoss, Reduction,
    ScaledHuberLoss, VggLoss, PIXEL_LEVELS,
};
use tracing::{debug, info};

/// Build the generator described by `cfg`
///
/// `input_shape` is the shape of one sample: `(C, H, W)` for images, `(D,)`
/// for tabular data. Returns the generator and its encoding dimension.
///
/// # Errors
///
/// [`Error::MissingFeatureGroups`] for the mixed loss without a slice map,
/// [`Error::Config`] for pixel cross-entropy on non-image input,
/// [`Error::MissingBackbone`] when a perceptual term is configured but the
/// provider has no backbone, plus any error from the provider.
pub fn build_ae(
    cfg: &Config,
    input_shape: &[usize],
    feature_group_slices: Option<FeatureGroupSlices>,
    provider: &dyn ArchitectureProvider,
) -> Result<(Box<dyn Generator>, usize)> {
    let is_image_data = input_shape.len() > 2;
    let variational = cfg.clust.encoder.is_variational();
    let recon_kind = cfg.enc.recon_loss;

    if recon_kind == ReconstructionLoss::Ce && !is_image_data {
        return Err(Error::Config(format!(
            "pixel cross-entropy needs image input (C, H, W), got shape {input_shape:?}"
        )));
    }

    let parts: AutoEncoderParts = if is_image_data {
        let decoding_dim = match recon_kind {
            ReconstructionLoss::Ce => input_shape[0] * PIXEL_LEVELS,
            _ => input_shape[0],
        };
        debug!(?input_shape, decoding_dim, variational, "building image autoencoder");
        provider.image_autoencoder(input_shape, decoding_dim, &cfg.enc, variational)?
    } else {
        debug!(?input_shape, variational, "building tabular autoencoder");
        provider.tabular_autoencoder(input_shape, &cfg.enc, variational)?
    };
    let enc_dim = parts.enc_dim;

    let base = base_loss(recon_kind, feature_group_slices.as_ref())?;
    let recon_loss = if cfg.clust.vgg_weight != 0.0 {
        let perceptual = VggLoss::with_defaults(provider.perceptual_backbone()?)?;
        debug!(
            weight = cfg.clust.vgg_weight,
            layer = perceptual.layer().number(),
            "adding perceptual term"
        );
        ReconLoss::composed(base, cfg.clust.vgg_weight, perceptual)
    } else {
        ReconLoss::Base(base)
    };

    let optimizer = AdamW::with_weight_decay(cfg.clust.enc_lr, cfg.clust.enc_wd);
    info!(
        encoder = %cfg.clust.encoder,
        recon_loss = %recon_loss.describe(),
        enc_dim,
        lr = cfg.clust.enc_lr,
        weight_decay = cfg.clust.enc_wd,
        "built generator"
    );

    let core = GeneratorCore::new(
        parts,
        recon_loss,
        recon_kind,
        cfg.clust.kl_weight,
        feature_group_slices,
        optimizer,
    );
    let generator: Box<dyn Generator> = if variational {
        Box::new(Vae::new(core, cfg.clust.vae_std_tform, cfg.misc.seed))
    } else {
        Box::new(AutoEncoder::new(core))
    };
    Ok((generator, enc_dim))
}

/// Base reconstruction loss for `kind`, summed over all elements
fn base_loss(
    kind: ReconstructionLoss,
    feature_group_slices: Option<&FeatureGroupSlices>,
) -> Result<Box<dyn LossFn>> {
    let reduction = Reduction::Sum;
    Ok(match kind {
        ReconstructionLoss::L1 => Box::new(L1Loss::new(reduction)),
        ReconstructionLoss::L2 => Box::new(MSELoss::new(reduction)),
        ReconstructionLoss::Bce => Box::new(BCELoss::new(reduction)),
        ReconstructionLoss::Huber => Box::new(ScaledHuberLoss::new(reduction)),
        ReconstructionLoss::Ce => Box::new(PixelCrossEntropy::new(reduction)),
        ReconstructionLoss::Mixed => {
            let slices = feature_group_slices.ok_or(Error::MissingFeatureGroups)?;
            Box::new(MixedLoss::new(slices, 1.0, reduction)?)
        }
    })
}

//! Shared generator state and the [`Generator`] trait

use super::arch::AutoEncoderParts;
use crate::autograd::backward;
use crate::config::{EncoderType, ReconstructionLoss};
use crate::data::FeatureGroupSlices;
use crate::error::{Error, Result};
use crate::nn::{Module, Sequential};
use crate::optim::{AdamW, Optimizer};
use crate::train::{argmax, ReconLoss, PIXEL_LEVELS};
use crate::Tensor;
use tracing::warn;

/// Result of one forward pass through a generator
pub struct RoutineOutput {
    /// Total loss, wired to the encoder and decoder parameters
    pub loss: Tensor,
    /// Reconstruction term per sample
    pub recon_loss: f32,
    /// Weighted prior term
    pub prior_loss: f32,
}

/// State shared by every generator
pub struct GeneratorCore {
    encoder: Sequential,
    decoder: Sequential,
    enc_dim: usize,
    recon_loss: ReconLoss,
    recon_kind: ReconstructionLoss,
    kl_weight: f32,
    feature_group_slices: Option<FeatureGroupSlices>,
    optimizer: AdamW,
}

impl GeneratorCore {
    pub fn new(
        parts: AutoEncoderParts,
        recon_loss: ReconLoss,
        recon_kind: ReconstructionLoss,
        kl_weight: f32,
        feature_group_slices: Option<FeatureGroupSlices>,
        optimizer: AdamW,
    ) -> Self {
        let AutoEncoderParts { encoder, decoder, enc_dim } = parts;
        Self {
            encoder,
            decoder,
            enc_dim,
            recon_loss,
            recon_kind,
            kl_weight,
            feature_group_slices,
            optimizer,
        }
    }

    pub fn encoder(&self) -> &Sequential {
        &self.encoder
    }

    pub fn decoder(&self) -> &Sequential {
        &self.decoder
    }

    pub fn enc_dim(&self) -> usize {
        self.enc_dim
    }

    pub fn recon_loss(&self) -> &ReconLoss {
        &self.recon_loss
    }

    pub fn recon_kind(&self) -> ReconstructionLoss {
        self.recon_kind
    }

    pub fn kl_weight(&self) -> f32 {
        self.kl_weight
    }

    pub fn feature_group_slices(&self) -> Option<&FeatureGroupSlices> {
        self.feature_group_slices.as_ref()
    }

    pub fn optimizer(&self) -> &AdamW {
        &self.optimizer
    }

    /// Encoder parameters followed by decoder parameters
    pub fn parameters(&self) -> Vec<&Tensor> {
        let mut params = self.encoder.parameters();
        params.extend(self.decoder.parameters());
        params
    }

    /// Reconstruction loss of decoder output against the input
    pub fn reconstruction(&self, decoded: &Tensor, x: &Tensor) -> Tensor {
        self.recon_loss.evaluate(decoded, x)
    }

    fn zero_grad(&self) {
        for param in self.parameters() {
            param.zero_grad();
        }
    }

    fn apply_gradients(&mut self) {
        let mut params = self.encoder.parameters_mut();
        params.extend(self.decoder.parameters_mut());
        self.optimizer.step_refs(&mut params);
    }

    /// Map raw decoder output into input space
    ///
    /// Pixel logits become intensities `argmax / 255`; for mixed data every
    /// discrete group becomes one-hot at its argmax. Other kinds pass through.
    pub fn map_output(&self, decoded: &Tensor) -> Tensor {
        match (self.recon_kind, &self.feature_group_slices) {
            (ReconstructionLoss::Ce, _) => pixel_intensities(decoded),
            (ReconstructionLoss::Mixed, Some(slices)) => one_hot_groups(decoded, slices),
            _ => decoded.detach(),
        }
    }
}

fn pixel_intensities(logits: &Tensor) -> Tensor {
    let shape = logits.shape();
    assert!(
        shape.len() >= 2 && shape[1] % PIXEL_LEVELS == 0,
        "Pixel logits need {PIXEL_LEVELS} values per channel, got shape {shape:?}"
    );
    let batch = shape[0];
    let positions = logits.len() / (batch * PIXEL_LEVELS);
    let data = logits.as_slice();

    let mut out = Vec::with_capacity(batch * positions);
    let mut column = vec![0.0; PIXEL_LEVELS];
    for n in 0..batch {
        for p in 0..positions {
            for (k, c) in column.iter_mut().enumerate() {
                *c = data[(n * PIXEL_LEVELS + k) * positions + p];
            }
            out.push(argmax(&column) as f32 / (PIXEL_LEVELS - 1) as f32);
        }
    }

    let mut out_shape = shape.to_vec();
    out_shape[1] /= PIXEL_LEVELS;
    Tensor::from_shape_vec(&out_shape, out, false)
}

fn one_hot_groups(decoded: &Tensor, slices: &FeatureGroupSlices) -> Tensor {
    let width = decoded.sample_len();
    let mut data = decoded.data().to_vec();
    for row in data.chunks_mut(width.max(1)) {
        for group in slices.discrete().unwrap_or_default() {
            let hot = argmax(&row[group.clone()]);
            for (i, v) in row[group.clone()].iter_mut().enumerate() {
                *v = if i == hot { 1.0 } else { 0.0 };
            }
        }
    }
    Tensor::from_shape_vec(decoded.shape(), data, false)
}

/// Trainable autoencoder-style model
pub trait Generator {
    fn core(&self) -> &GeneratorCore;

    fn core_mut(&mut self) -> &mut GeneratorCore;

    fn kind(&self) -> EncoderType;

    /// Deterministic latent code
    fn encode(&self, x: &Tensor) -> Tensor;

    /// Forward pass with losses
    fn routine(&mut self, x: &Tensor) -> RoutineOutput;

    /// Raw decoder output (logits for pixel cross-entropy)
    fn decode(&self, z: &Tensor) -> Tensor {
        self.core().decoder().forward(z)
    }

    /// Encode, decode and map back into input space
    fn reconstruct(&self, x: &Tensor) -> Tensor {
        let decoded = self.decode(&self.encode(x));
        self.core().map_output(&decoded)
    }

    /// One optimisation step on a batch, returning the loss
    fn step(&mut self, x: &Tensor) -> Result<f32> {
        self.core().zero_grad();
        let RoutineOutput { mut loss, .. } = self.routine(x);
        let value = loss.item();
        if !value.is_finite() {
            warn!(loss = value, kind = %self.kind(), "non-finite generator loss, skipping update");
            return Err(Error::NonFiniteLoss(value));
        }
        backward(&mut loss, None);
        self.core_mut().apply_gradients();
        Ok(value)
    }

    fn enc_dim(&self) -> usize {
        self.core().enc_dim()
    }

    fn num_parameters(&self) -> usize {
        self.core().parameters().iter().map(|p| p.len()).sum()
    }
}

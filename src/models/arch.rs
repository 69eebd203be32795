//! Encoder/decoder architectures
//!
//! [`build_ae`](super::build_ae) never constructs layers itself: it asks an
//! [`ArchitectureProvider`] for an encoder/decoder pair and, when a
//! perceptual term is configured, for a feature backbone. Convolutional
//! stacks and pretrained backbones live behind this trait.

use crate::config::{EncoderArgs, ReconstructionLoss};
use crate::error::{Error, Result};
use crate::nn::{Flatten, Linear, Relu, Sequential, Sigmoid, Unflatten};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;

/// Encoder, decoder and the size of the latent code
pub struct AutoEncoderParts {
    pub encoder: Sequential,
    pub decoder: Sequential,
    /// Latent dimension; a variational encoder emits twice this many values
    pub enc_dim: usize,
}

/// Source of network architectures for the generator builder
///
/// A decoder built for [`ReconstructionLoss::Bce`] must emit probabilities.
pub trait ArchitectureProvider {
    /// Autoencoder for per-sample shape `(C, H, W)`
    ///
    /// The decoder emits `decoding_dim` channels at the input resolution.
    fn image_autoencoder(
        &self,
        input_shape: &[usize],
        decoding_dim: usize,
        args: &EncoderArgs,
        variational: bool,
    ) -> Result<AutoEncoderParts>;

    /// Autoencoder for flat feature vectors
    fn tabular_autoencoder(
        &self,
        input_shape: &[usize],
        args: &EncoderArgs,
        variational: bool,
    ) -> Result<AutoEncoderParts>;

    /// Feature extractor for the perceptual loss
    fn perceptual_backbone(&self) -> Result<Sequential>;
}

type BackboneFactory = Box<dyn Fn() -> Sequential>;

/// Fully connected architectures
///
/// Image inputs are flattened; hidden widths start at `init_chans` and
/// double per level. Tabular inputs use `init_chans` at every level. The
/// decoder ends in a sigmoid when the reconstruction loss is BCE.
pub struct DenseArchitecture {
    rng: RefCell<StdRng>,
    backbone: Option<BackboneFactory>,
}

impl DenseArchitecture {
    /// Weights are drawn from a generator seeded with `seed`
    pub fn new(seed: u64) -> Self {
        Self { rng: RefCell::new(StdRng::seed_from_u64(seed)), backbone: None }
    }

    /// Supply the perceptual backbone
    pub fn with_perceptual_backbone(
        mut self,
        factory: impl Fn() -> Sequential + 'static,
    ) -> Self {
        self.backbone = Some(Box::new(factory));
        self
    }

    fn mlp_pair(
        &self,
        input_shape: &[usize],
        output_shape: &[usize],
        hidden: &[usize],
        args: &EncoderArgs,
        variational: bool,
    ) -> Result<AutoEncoderParts> {
        let enc_dim = args.out_dim;
        if enc_dim == 0 {
            return Err(Error::Config("encoding dimension must be positive".into()));
        }
        let input_dim: usize = input_shape.iter().product();
        let output_dim: usize = output_shape.iter().product();
        if input_dim == 0 {
            return Err(Error::Config(format!("empty input shape {input_shape:?}")));
        }

        let mut rng = self.rng.borrow_mut();
        let code_dim = if variational { 2 * enc_dim } else { enc_dim };

        let mut encoder = Sequential::new().with(Flatten);
        let mut width = input_dim;
        for &h in hidden {
            encoder.push(Linear::new(width, h, &mut *rng));
            encoder.push(Relu);
            width = h;
        }
        encoder.push(Linear::new(width, code_dim, &mut *rng));

        let mut decoder = Sequential::new();
        let mut width = enc_dim;
        for &h in hidden.iter().rev() {
            decoder.push(Linear::new(width, h, &mut *rng));
            decoder.push(Relu);
            width = h;
        }
        decoder.push(Linear::new(width, output_dim, &mut *rng));
        if args.recon_loss == ReconstructionLoss::Bce {
            decoder.push(Sigmoid);
        }
        decoder.push(Unflatten::new(output_shape));

        Ok(AutoEncoderParts { encoder, decoder, enc_dim })
    }
}

impl ArchitectureProvider for DenseArchitecture {
    fn image_autoencoder(
        &self,
        input_shape: &[usize],
        decoding_dim: usize,
        args: &EncoderArgs,
        variational: bool,
    ) -> Result<AutoEncoderParts> {
        let mut output_shape = input_shape.to_vec();
        output_shape[0] = decoding_dim;
        let hidden = (0..args.levels)
            .map(|level| {
                let factor = 2usize.checked_pow(u32::try_from(level).ok()?)?;
                args.init_chans.checked_mul(factor)
            })
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(|| {
                Error::Config(format!(
                    "{} levels from {} channels overflow the hidden width",
                    args.levels, args.init_chans
                ))
            })?;
        self.mlp_pair(input_shape, &output_shape, &hidden, args, variational)
    }

    fn tabular_autoencoder(
        &self,
        input_shape: &[usize],
        args: &EncoderArgs,
        variational: bool,
    ) -> Result<AutoEncoderParts> {
        let hidden = vec![args.init_chans; args.levels];
        self.mlp_pair(input_shape, input_shape, &hidden, args, variational)
    }

    fn perceptual_backbone(&self) -> Result<Sequential> {
        self.backbone.as_ref().map(|factory| factory()).ok_or(Error::MissingBackbone)
    }
}

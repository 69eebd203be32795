//! Variational autoencoder

use super::generator::{Generator, GeneratorCore, RoutineOutput};
use crate::autograd::{add, exp, ln, mul, scale, shift, sigmoid, slice_cols, softplus, sub, sum};
use crate::config::{EncoderType, VaeStdTform};
use crate::nn::Module;
use crate::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// Diagonal-Gaussian VAE with the reparameterisation trick
///
/// The encoder emits `2 * enc_dim` values per sample: the mean followed by
/// the raw scale, which `std_tform` maps to a positive standard deviation.
pub struct Vae {
    core: GeneratorCore,
    std_tform: VaeStdTform,
    rng: StdRng,
}

impl Vae {
    pub fn new(core: GeneratorCore, std_tform: VaeStdTform, seed: u64) -> Self {
        Self { core, std_tform, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn std_tform(&self) -> VaeStdTform {
        self.std_tform
    }

    /// Mean and standard deviation of `q(z | x)`
    pub fn encode_distribution(&self, x: &Tensor) -> (Tensor, Tensor) {
        let latent = self.core.enc_dim();
        let h = self.core.encoder().forward(x);
        assert_eq!(
            h.sample_len(),
            2 * latent,
            "Variational encoder must emit {} values per sample",
            2 * latent
        );
        let mean = slice_cols(&h, 0..latent);
        let raw = slice_cols(&h, latent..2 * latent);
        let std = match self.std_tform {
            VaeStdTform::Softplus => softplus(&raw),
            VaeStdTform::Exp => exp(&raw),
            VaeStdTform::Sigmoid => sigmoid(&raw),
        };
        (mean, std)
    }

    fn sample(&mut self, mean: &Tensor, std: &Tensor) -> Tensor {
        let noise = standard_normal(&mut self.rng, mean.len());
        let eps = Tensor::from_shape_vec(mean.shape(), noise, false);
        add(mean, &mul(std, &eps))
    }
}

/// Box-Muller draws from N(0, 1)
fn standard_normal<R: Rng>(rng: &mut R, len: usize) -> Vec<f32> {
    (0..len)
        .map(|_| {
            let u1: f32 = rng.random::<f32>().max(1e-10);
            let u2: f32 = rng.random();
            (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
        })
        .collect()
}

/// `sum(0.5 * (std² + mean² - 1) - ln(std)) / n`
fn kl_divergence(mean: &Tensor, std: &Tensor, n: f32) -> Tensor {
    let second_moment = add(&mul(std, std), &mul(mean, mean));
    let per_dim = sub(&shift(&scale(&second_moment, 0.5), -0.5), &ln(std));
    scale(&sum(&per_dim), 1.0 / n)
}

impl Generator for Vae {
    fn core(&self) -> &GeneratorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut GeneratorCore {
        &mut self.core
    }

    fn kind(&self) -> EncoderType {
        EncoderType::Vae
    }

    fn encode(&self, x: &Tensor) -> Tensor {
        self.encode_distribution(x).0
    }

    fn routine(&mut self, x: &Tensor) -> RoutineOutput {
        let n = x.batch_size() as f32;
        let (mean, std) = self.encode_distribution(x);
        let z = self.sample(&mean, &std);
        let decoded = self.decode(&z);

        let recon = scale(&self.core.reconstruction(&decoded, x), 1.0 / n);
        let prior = scale(&kl_divergence(&mean, &std, n), self.core.kl_weight());
        RoutineOutput {
            recon_loss: recon.item(),
            prior_loss: prior.item(),
            loss: add(&recon, &prior),
        }
    }
}

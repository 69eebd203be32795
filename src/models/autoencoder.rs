//! Deterministic autoencoder

use super::generator::{Generator, GeneratorCore, RoutineOutput};
use crate::autograd::{add, mul, scale, sum};
use crate::config::EncoderType;
use crate::nn::Module;
use crate::Tensor;

/// Autoencoder with an optional L2 penalty on the latent code
///
/// `loss = recon / N + kl_weight * sum(z²) / N`
pub struct AutoEncoder {
    core: GeneratorCore,
}

impl AutoEncoder {
    pub fn new(core: GeneratorCore) -> Self {
        Self { core }
    }
}

impl Generator for AutoEncoder {
    fn core(&self) -> &GeneratorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut GeneratorCore {
        &mut self.core
    }

    fn kind(&self) -> EncoderType {
        EncoderType::Ae
    }

    fn encode(&self, x: &Tensor) -> Tensor {
        self.core.encoder().forward(x)
    }

    fn routine(&mut self, x: &Tensor) -> RoutineOutput {
        let n = x.batch_size() as f32;
        let z = self.encode(x);
        let decoded = self.decode(&z);
        let recon = scale(&self.core.reconstruction(&decoded, x), 1.0 / n);
        let recon_loss = recon.item();

        let kl_weight = self.core.kl_weight();
        if kl_weight == 0.0 {
            return RoutineOutput { loss: recon, recon_loss, prior_loss: 0.0 };
        }

        let prior = scale(&sum(&mul(&z, &z)), kl_weight / n);
        let prior_loss = prior.item();
        RoutineOutput { loss: add(&recon, &prior), recon_loss, prior_loss }
    }
}

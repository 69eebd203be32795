//! Fully connected layer

use super::Module;
use crate::autograd::{bias_add, matmul};
use crate::Tensor;
use rand::Rng;

/// Affine map `y = x W + b`
///
/// `weight` is stored row-major as `(in_features, out_features)`.
pub struct Linear {
    pub weight: Tensor,
    pub bias: Tensor,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Create a layer with weights drawn from U(-1/√in, 1/√in)
    pub fn new<R: Rng>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        let bound = 1.0 / (in_features.max(1) as f32).sqrt();
        let weight: Vec<f32> =
            (0..in_features * out_features).map(|_| rng.random_range(-bound..=bound)).collect();
        let bias: Vec<f32> = (0..out_features).map(|_| rng.random_range(-bound..=bound)).collect();

        Self {
            weight: Tensor::from_shape_vec(&[in_features, out_features], weight, true),
            bias: Tensor::from_vec(bias, true),
            in_features,
            out_features,
        }
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor) -> Tensor {
        let rows = input.batch_size();
        assert_eq!(
            input.sample_len(),
            self.in_features,
            "Linear expects {} input features, got {}",
            self.in_features,
            input.sample_len()
        );
        let projected = matmul(input, &self.weight, rows, self.in_features, self.out_features);
        bias_add(&projected, &self.bias, rows, self.out_features)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weight, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.weight, &mut self.bias]
    }

    fn name(&self) -> &str {
        "Linear"
    }
}

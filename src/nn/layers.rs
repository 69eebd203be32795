//! Parameter-free layers

use super::Module;
use crate::autograd::{grad_reverse, relu, reshape, sigmoid};
use crate::Tensor;

/// Element-wise ReLU
pub struct Relu;

impl Module for Relu {
    fn forward(&self, input: &Tensor) -> Tensor {
        relu(input)
    }

    fn name(&self) -> &str {
        "ReLU"
    }
}

/// Element-wise logistic sigmoid
pub struct Sigmoid;

impl Module for Sigmoid {
    fn forward(&self, input: &Tensor) -> Tensor {
        sigmoid(input)
    }

    fn name(&self) -> &str {
        "Sigmoid"
    }
}

/// Passes its input through untouched
pub struct Identity;

impl Module for Identity {
    fn forward(&self, input: &Tensor) -> Tensor {
        input.clone()
    }

    fn name(&self) -> &str {
        "Identity"
    }
}

/// `(N, d1, d2, ...) -> (N, d1 * d2 * ...)`
pub struct Flatten;

impl Module for Flatten {
    fn forward(&self, input: &Tensor) -> Tensor {
        reshape(input, &[input.batch_size(), input.sample_len()])
    }

    fn name(&self) -> &str {
        "Flatten"
    }
}

/// `(N, D) -> (N, *shape)` where `shape` multiplies out to `D`
pub struct Unflatten {
    shape: Vec<usize>,
}

impl Unflatten {
    pub fn new(shape: &[usize]) -> Self {
        Self { shape: shape.to_vec() }
    }
}

impl Module for Unflatten {
    fn forward(&self, input: &Tensor) -> Tensor {
        let mut shape = Vec::with_capacity(self.shape.len() + 1);
        shape.push(input.batch_size());
        shape.extend_from_slice(&self.shape);
        reshape(input, &shape)
    }

    fn name(&self) -> &str {
        "Unflatten"
    }
}

/// Gradient-reversal layer
///
/// Identity in the forward pass, multiplies the gradient by `-lambda` in the
/// backward pass.
pub struct GradReverse {
    pub lambda: f32,
}

impl GradReverse {
    pub fn new(lambda: f32) -> Self {
        Self { lambda }
    }
}

impl Default for GradReverse {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Module for GradReverse {
    fn forward(&self, input: &Tensor) -> Tensor {
        grad_reverse(input, self.lambda)
    }

    fn name(&self) -> &str {
        "GradReverse"
    }
}

//! Smooth L1 loss and the scaled Huber reconstruction loss

use crate::train::loss::kernel::{assert_same_len, ItemLosses};
use crate::train::loss::{LossFn, Reduction};
use crate::Tensor;

/// Value and derivative of smooth L1 at `d`
fn smooth_l1(d: f32, beta: f32) -> (f32, f32) {
    if d.abs() < beta {
        (0.5 * d * d / beta, d / beta)
    } else {
        let slope = if d == 0.0 { 0.0 } else { d.signum() };
        (d.abs() - 0.5 * beta, slope)
    }
}

/// Smooth L1 Loss
///
/// For |d| < beta:  L = 0.5 * d^2 / beta
/// Otherwise:       L = |d| - 0.5 * beta
///
/// `beta = 0` degenerates to [`L1Loss`](super::L1Loss).
#[derive(Debug, Clone, Copy)]
pub struct SmoothL1Loss {
    beta: f32,
    pub reduction: Reduction,
}

impl SmoothL1Loss {
    pub fn new(beta: f32, reduction: Reduction) -> Self {
        assert!(beta >= 0.0, "beta must be non-negative");
        Self { beta, reduction }
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }
}

impl Default for SmoothL1Loss {
    fn default() -> Self {
        Self::new(1.0, Reduction::Mean)
    }
}

impl LossFn for SmoothL1Loss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_same_len(predictions, targets);

        let (values, grad): (Vec<f32>, Vec<f32>) = predictions
            .data()
            .iter()
            .zip(targets.data().iter())
            .map(|(&p, &t)| smooth_l1(p - t, self.beta))
            .unzip();

        ItemLosses::elementwise(predictions, values, grad.into())
            .reduce(predictions, self.reduction)
    }

    fn name(&self) -> &'static str {
        "SmoothL1"
    }
}

/// Huber loss on a ×10 scale
///
/// `L = 0.1 * smooth_l1(10 * pred, 10 * target)` with `beta = 1`, i.e. the
/// quadratic region covers errors below 0.1 in the original units.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaledHuberLoss {
    pub reduction: Reduction,
}

impl ScaledHuberLoss {
    const SCALE: f32 = 10.0;

    pub fn new(reduction: Reduction) -> Self {
        Self { reduction }
    }
}

impl LossFn for ScaledHuberLoss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_same_len(predictions, targets);

        let (values, grad): (Vec<f32>, Vec<f32>) = predictions
            .data()
            .iter()
            .zip(targets.data().iter())
            .map(|(&p, &t)| {
                let (value, slope) = smooth_l1(Self::SCALE * (p - t), 1.0);
                // outer 1/SCALE and inner SCALE cancel in the derivative
                (value / Self::SCALE, slope)
            })
            .unzip();

        ItemLosses::elementwise(predictions, values, grad.into())
            .reduce(predictions, self.reduction)
    }

    fn name(&self) -> &'static str {
        "Huber"
    }
}

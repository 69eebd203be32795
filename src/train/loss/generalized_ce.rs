//! Generalized cross-entropy for learning under label noise

use super::cross_entropy::{class_cross_entropy, softmax_rows};
use super::Reduction;
use crate::error::{Error, Result};
use crate::Tensor;

/// Generalized Cross-Entropy (Zhang & Sabuncu, 2018)
///
/// Reweights the per-sample cross-entropy by `p_y^q · q`, where `p_y` is the
/// predicted probability of the target class. The weight is a constant for
/// the backward pass, so confidently-fit samples dominate the gradient and
/// noisy labels with low `p_y` are damped.
///
/// The result is unreduced, shape `(N,)`.
#[derive(Debug, Clone, Copy)]
pub struct GeneralizedCELoss {
    pub q: f32,
}

impl Default for GeneralizedCELoss {
    fn default() -> Self {
        Self { q: 0.7 }
    }
}

impl GeneralizedCELoss {
    pub fn new(q: f32) -> Self {
        Self { q }
    }

    /// Per-sample weighted cross-entropy of `(N, K)` logits against class indices
    ///
    /// # Errors
    ///
    /// [`Error::NumericalInstability`] if the softmax contains NaN.
    pub fn forward(&self, logits: &Tensor, targets: &[usize]) -> Result<Tensor> {
        let rows = logits.batch_size();
        let num_classes = logits.sample_len();
        assert_eq!(targets.len(), rows, "One target class per sample required");

        let probs = softmax_rows(logits.as_slice(), num_classes);
        let mean_p = probs.iter().sum::<f32>() / probs.len().max(1) as f32;
        if mean_p.is_nan() {
            return Err(Error::NumericalInstability("GCE_p"));
        }

        let weights: Vec<f32> = targets
            .iter()
            .enumerate()
            .map(|(n, &t)| probs[n * num_classes + t].powf(self.q) * self.q)
            .collect();

        let mut items = class_cross_entropy(logits.as_slice(), targets, num_classes, vec![rows]);
        items.weight_items(&weights);
        Ok(items.reduce(logits, Reduction::None))
    }

    pub fn name(&self) -> &'static str {
        "GeneralizedCE"
    }
}

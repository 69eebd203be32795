//! Pixel-wise cross-entropy over 256 intensity levels

use super::cross_entropy::class_cross_entropy;
use super::{LossFn, Reduction};
use crate::Tensor;

/// Number of intensity classes per channel
pub const PIXEL_LEVELS: usize = 256;

/// Map an intensity in [0, 1] to its class in `0..256`
pub fn intensity_to_class(value: f32) -> usize {
    (value * (PIXEL_LEVELS - 1) as f32).round().clamp(0.0, (PIXEL_LEVELS - 1) as f32) as usize
}

/// Cross-entropy treating each pixel intensity as one of 256 classes
///
/// Predictions hold `256 × C` channels per sample and are viewed as
/// `(N, 256, C, ...)`; targets are intensities in [0, 1] shaped
/// `(N, C, ...)`.
///
/// # Panics
///
/// If the prediction has not exactly 256 values per target value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelCrossEntropy {
    pub reduction: Reduction,
}

impl PixelCrossEntropy {
    pub fn new(reduction: Reduction) -> Self {
        Self { reduction }
    }
}

impl LossFn for PixelCrossEntropy {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_eq!(
            predictions.len(),
            PIXEL_LEVELS * targets.len(),
            "Pixel cross-entropy needs {PIXEL_LEVELS} logits per target value"
        );

        let classes: Vec<usize> = targets.data().iter().map(|&v| intensity_to_class(v)).collect();

        class_cross_entropy(
            predictions.as_slice(),
            &classes,
            PIXEL_LEVELS,
            targets.shape().to_vec(),
        )
            .reduce(predictions, self.reduction)
    }

    fn name(&self) -> &'static str {
        "PixelCrossEntropy"
    }
}

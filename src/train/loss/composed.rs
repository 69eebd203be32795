//! Reconstruction loss with an optional perceptual term

use super::{LossFn, VggLoss};
use crate::autograd::add_scaled;
use crate::Tensor;

/// Reconstruction loss bound to a generator
///
/// Either a plain base loss or the base loss plus a weighted perceptual
/// term, both evaluated on the same `(prediction, target)` pair.
pub enum ReconLoss {
    Base(Box<dyn LossFn>),
    Composed { base: Box<dyn LossFn>, weight: f32, perceptual: VggLoss },
}

impl ReconLoss {
    pub fn base(loss: impl LossFn + 'static) -> Self {
        Self::Base(Box::new(loss))
    }

    pub fn composed(base: Box<dyn LossFn>, weight: f32, perceptual: VggLoss) -> Self {
        Self::Composed { base, weight, perceptual }
    }

    pub fn base_loss(&self) -> &dyn LossFn {
        match self {
            Self::Base(base) | Self::Composed { base, .. } => base.as_ref(),
        }
    }

    pub fn is_composed(&self) -> bool {
        matches!(self, Self::Composed { .. })
    }

    /// `base(pred, target) [+ weight * perceptual(pred, target)]`
    pub fn evaluate(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        match self {
            Self::Base(base) => base.forward(predictions, targets),
            Self::Composed { base, weight, perceptual } => add_scaled(
                &base.forward(predictions, targets),
                &perceptual.forward(predictions, targets),
                *weight,
            ),
        }
    }

    /// Display name, e.g. `MSE` or `MSE+0.5*VGG`
    pub fn describe(&self) -> String {
        match self {
            Self::Base(base) => base.name().to_string(),
            Self::Composed { base, weight, perceptual } => {
                format!("{}+{weight}*{}", base.name(), perceptual.name())
            }
        }
    }
}

impl std::fmt::Debug for ReconLoss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ReconLoss").field(&self.describe()).finish()
    }
}

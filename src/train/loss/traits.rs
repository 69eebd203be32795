//! Loss function trait

use crate::Tensor;

/// Trait for loss functions
pub trait LossFn {
    /// Compute loss given predictions and targets
    ///
    /// Gradients flow into `predictions` only; targets are treated as
    /// constants. The result is a scalar unless the loss is configured with
    /// [`Reduction::None`](super::Reduction::None).
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor;

    /// Name of the loss function
    fn name(&self) -> &str;
}

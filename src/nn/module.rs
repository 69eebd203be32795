//! Module trait

use crate::Tensor;

/// A differentiable layer with owned parameters
pub trait Module {
    /// Apply the layer; the leading dimension is the batch
    fn forward(&self, input: &Tensor) -> Tensor;

    /// Trainable parameters, in a stable order
    fn parameters(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    /// Mutable access to the parameters, same order as [`Module::parameters`]
    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }

    /// Layer name for logging
    fn name(&self) -> &str;
}

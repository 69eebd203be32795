//! Mean Squared Error loss

use crate::train::loss::kernel::{assert_same_len, ItemLosses};
use crate::train::loss::{LossFn, Reduction};
use crate::Tensor;

/// Mean Squared Error Loss
///
/// L_i = (predictions_i - targets_i)^2, combined with `reduction`.
///
/// # Example
///
/// ```
/// use agrupar::train::{LossFn, MSELoss, Reduction};
/// use agrupar::Tensor;
///
/// let loss_fn = MSELoss::new(Reduction::Mean);
/// let pred = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
/// let target = Tensor::from_vec(vec![1.5, 2.5, 3.5], false);
///
/// let loss = loss_fn.forward(&pred, &target);
/// assert!((loss.item() - 0.25).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MSELoss {
    pub reduction: Reduction,
}

impl MSELoss {
    pub fn new(reduction: Reduction) -> Self {
        Self { reduction }
    }
}

impl LossFn for MSELoss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_same_len(predictions, targets);

        let diff = predictions.data() - targets.data();
        let values = diff.iter().map(|d| d * d).collect();
        // d(d^2)/d(pred) = 2 * (pred - target)
        let grad = &diff * 2.0;

        ItemLosses::elementwise(predictions, values, grad).reduce(predictions, self.reduction)
    }

    fn name(&self) -> &'static str {
        "MSE"
    }
}

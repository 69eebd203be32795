//! L1 loss (Mean Absolute Error)

use crate::train::loss::kernel::{assert_same_len, ItemLosses};
use crate::train::loss::{LossFn, Reduction};
use crate::Tensor;

/// L1 Loss
///
/// L_i = |predictions_i - targets_i|
///
/// More robust to outliers than MSE, but has non-smooth gradient at zero;
/// the subgradient used there is 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct L1Loss {
    pub reduction: Reduction,
}

impl L1Loss {
    pub fn new(reduction: Reduction) -> Self {
        Self { reduction }
    }
}

impl LossFn for L1Loss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_same_len(predictions, targets);

        let diff = predictions.data() - targets.data();
        let values = diff.iter().map(|d| d.abs()).collect();
        let grad = diff.mapv(|d| if d == 0.0 { 0.0 } else { d.signum() });

        ItemLosses::elementwise(predictions, values, grad).reduce(predictions, self.reduction)
    }

    fn name(&self) -> &'static str {
        "L1"
    }
}

//! Binary cross-entropy on probabilities

use super::kernel::{assert_same_len, ItemLosses};
use super::{LossFn, Reduction};
use crate::Tensor;
use ndarray::Array1;

/// Lower bound applied to each log term
const LOG_FLOOR: f32 = -100.0;

/// Binary Cross-Entropy Loss
///
/// L_i = -(t_i * ln(p_i) + (1 - t_i) * ln(1 - p_i))
///
/// Predictions are probabilities in [0, 1] (typically the output of a
/// sigmoid). Each log term is clamped at -100 so saturated predictions give
/// a large finite loss instead of infinity.
///
/// # Panics
///
/// If any prediction lies outside [0, 1] or is NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct BCELoss {
    pub reduction: Reduction,
}

impl BCELoss {
    pub fn new(reduction: Reduction) -> Self {
        Self { reduction }
    }
}

impl LossFn for BCELoss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_same_len(predictions, targets);
        assert!(
            predictions.data().iter().all(|p| (0.0..=1.0).contains(p)),
            "BCE predictions must lie in [0, 1]"
        );

        let (values, grad): (Vec<f32>, Vec<f32>) = predictions
            .data()
            .iter()
            .zip(targets.data().iter())
            .map(|(&p, &t)| {
                let log_p = p.ln().max(LOG_FLOOR);
                let log_1mp = (1.0 - p).ln().max(LOG_FLOOR);
                let value = -(t * log_p + (1.0 - t) * log_1mp);
                // d/dp = (p - t) / (p (1 - p)), bounded away from the poles
                let slope = (p - t) / (p * (1.0 - p)).max(1e-12);
                (value, slope)
            })
            .unzip();

        ItemLosses::elementwise(predictions, values, Array1::from(grad))
            .reduce(predictions, self.reduction)
    }

    fn name(&self) -> &'static str {
        "BCE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::backward;
    use approx::assert_relative_eq;

    #[test]
    fn test_bce_known_value() {
        let pred = Tensor::from_vec(vec![0.5, 0.9], false);
        let target = Tensor::from_vec(vec![1.0, 0.0], false);
        let loss = BCELoss::new(Reduction::Sum).forward(&pred, &target);
        assert_relative_eq!(loss.item(), -(0.5f32.ln()) - (0.1f32.ln()), epsilon = 1e-5);
    }

    #[test]
    fn test_bce_saturated_prediction_is_finite() {
        let pred = Tensor::from_vec(vec![0.0, 1.0], false);
        let target = Tensor::from_vec(vec![1.0, 0.0], false);
        let loss = BCELoss::new(Reduction::Sum).forward(&pred, &target);
        assert_relative_eq!(loss.item(), 200.0);
    }

    #[test]
    #[should_panic(expected = "must lie in [0, 1]")]
    fn test_bce_rejects_out_of_range_predictions() {
        let pred = Tensor::from_vec(vec![-0.5, 1.7], false);
        let target = Tensor::from_vec(vec![1.0, 0.0], false);
        let _ = BCELoss::new(Reduction::Sum).forward(&pred, &target);
    }

    #[test]
    #[should_panic(expected = "must lie in [0, 1]")]
    fn test_bce_rejects_nan_prediction() {
        let pred = Tensor::from_vec(vec![f32::NAN], false);
        let target = Tensor::from_vec(vec![1.0], false);
        let _ = BCELoss::default().forward(&pred, &target);
    }

    #[test]
    fn test_bce_gradient() {
        let pred = Tensor::from_vec(vec![0.25], true);
        let target = Tensor::from_vec(vec![1.0], false);
        let mut loss = BCELoss::default().forward(&pred, &target);
        backward(&mut loss, None);
        // -1/p
        assert_relative_eq!(pred.grad().expect("grad")[0], -4.0, epsilon = 1e-5);
    }
}

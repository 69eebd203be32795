//! Cross-entropy over a class dimension

use super::kernel::ItemLosses;
use super::{LossFn, Reduction};
use crate::Tensor;
use ndarray::Array1;

/// Compute softmax: exp(x_i) / sum(exp(x_j))
pub(crate) fn softmax(x: &[f32]) -> Vec<f32> {
    let max = x.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp_x: Vec<f32> = x.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exp_x.iter().sum();
    exp_x.into_iter().map(|e| e / sum).collect()
}

/// Row-wise softmax of an `(N, K)` matrix
pub(crate) fn softmax_rows(logits: &[f32], num_classes: usize) -> Vec<f32> {
    logits.chunks(num_classes).flat_map(softmax).collect()
}

/// Index of the first maximum
pub(crate) fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) })
        .0
}

/// Cross-entropy of logits laid out as `(N, K, S)` against class indices `(N, S)`
///
/// `S` is the product of any trailing (spatial) dimensions and may be 1. One
/// item per `(n, s)` position; `item_shape` must multiply out to `N * S`.
pub(crate) fn class_cross_entropy(
    logits: &[f32],
    classes: &[usize],
    num_classes: usize,
    item_shape: Vec<usize>,
) -> ItemLosses {
    let items = classes.len();
    assert!(num_classes > 0, "Cross-entropy needs at least one class");
    assert_eq!(
        logits.len(),
        items * num_classes,
        "Logits must hold {num_classes} classes per target, got {} values for {items} targets",
        logits.len()
    );
    assert_eq!(item_shape.iter().product::<usize>(), items, "Item shape does not match targets");

    let batch = item_shape.first().copied().unwrap_or(1).max(1);
    let spatial = items / batch;

    let mut values = vec![0.0; items];
    let mut local_grad = Array1::zeros(logits.len());
    let mut owner = vec![0; logits.len()];
    let mut column = vec![0.0; num_classes];

    for n in 0..batch {
        for s in 0..spatial {
            let item = n * spatial + s;
            let target = classes[item];
            assert!(target < num_classes, "Class {target} out of range for {num_classes} classes");

            let index = |k: usize| (n * num_classes + k) * spatial + s;
            for (k, c) in column.iter_mut().enumerate() {
                *c = logits[index(k)];
            }
            let max = column.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
            let log_sum_exp = max + column.iter().map(|v| (v - max).exp()).sum::<f32>().ln();
            values[item] = log_sum_exp - column[target];
            let probs = softmax(&column);

            // d(CE)/d(logits) = softmax - onehot
            for (k, &p) in probs.iter().enumerate() {
                let j = index(k);
                local_grad[j] = if k == target { p - 1.0 } else { p };
                owner[j] = item;
            }
        }
    }

    ItemLosses { values, item_shape, local_grad, owner: Some(owner) }
}

/// Cross Entropy Loss over class indices
///
/// Predictions are logits shaped `(N, K, d1, ...)`; targets hold class
/// indices (as floats) shaped `(N, d1, ...)`.
///
/// # Example
///
/// ```
/// use agrupar::train::{CrossEntropyLoss, LossFn, Reduction};
/// use agrupar::Tensor;
///
/// let loss_fn = CrossEntropyLoss::new(Reduction::Mean);
/// let logits = Tensor::from_shape_vec(&[1, 3], vec![2.0, 1.0, 0.5], true);
/// let targets = Tensor::from_shape_vec(&[1], vec![0.0], false);
///
/// let loss = loss_fn.forward(&logits, &targets);
/// assert!(loss.item() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossEntropyLoss {
    pub reduction: Reduction,
}

impl CrossEntropyLoss {
    pub fn new(reduction: Reduction) -> Self {
        Self { reduction }
    }
}

impl LossFn for CrossEntropyLoss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert!(predictions.ndim() >= 2, "Cross-entropy logits need a class dimension");
        let num_classes = predictions.shape()[1];
        let classes: Vec<usize> =
            targets.data().iter().map(|&t| t.round().max(0.0) as usize).collect();

        class_cross_entropy(predictions.as_slice(), &classes, num_classes, targets.shape().to_vec())
            .reduce(predictions, self.reduction)
    }

    fn name(&self) -> &'static str {
        "CrossEntropy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::backward;
    use approx::assert_relative_eq;

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert_relative_eq!(p.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_argmax_takes_first_maximum() {
        assert_eq!(argmax(&[0.0, 1.0, 1.0]), 1);
        assert_eq!(argmax(&[3.0]), 0);
    }

    #[test]
    fn test_uniform_logits_give_log_k() {
        let logits = Tensor::from_shape_vec(&[2, 4], vec![0.0; 8], true);
        let targets = Tensor::from_shape_vec(&[2], vec![1.0, 3.0], false);
        let loss = CrossEntropyLoss::new(Reduction::Mean).forward(&logits, &targets);
        assert_relative_eq!(loss.item(), 4.0f32.ln(), epsilon = 1e-6);
    }

    #[test]
    fn test_gradient_is_softmax_minus_onehot() {
        let logits = Tensor::from_shape_vec(&[1, 2], vec![0.0, 0.0], true);
        let targets = Tensor::from_shape_vec(&[1], vec![0.0], false);
        let mut loss = CrossEntropyLoss::new(Reduction::Sum).forward(&logits, &targets);
        backward(&mut loss, None);
        let grad = logits.grad().expect("grad");
        assert_relative_eq!(grad[0], -0.5, epsilon = 1e-6);
        assert_relative_eq!(grad[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_spatial_layout() {
        // (N=1, K=2, S=2): position 0 favours class 0, position 1 favours class 1
        let logits = Tensor::from_shape_vec(&[1, 2, 2], vec![5.0, -5.0, -5.0, 5.0], false);
        let good = Tensor::from_shape_vec(&[1, 2], vec![0.0, 1.0], false);
        let bad = Tensor::from_shape_vec(&[1, 2], vec![1.0, 0.0], false);

        let loss_fn = CrossEntropyLoss::new(Reduction::None);
        let low = loss_fn.forward(&logits, &good);
        let high = loss_fn.forward(&logits, &bad);
        assert_eq!(low.shape(), &[1, 2]);
        assert!(low.data().iter().all(|&v| v < 1e-3));
        assert!(high.data().iter().all(|&v| v > 9.0));
    }
}

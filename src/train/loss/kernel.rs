//! Shared forward/backward plumbing for losses
//!
//! A loss fills in one value per item together with the derivative of each
//! item with respect to every prediction element it depends on. Reduction
//! and gradient routing are handled here.

use super::Reduction;
use crate::autograd::{BackwardOp, GradCell, Tensor};
use ndarray::Array1;
use std::rc::Rc;

/// Per-item loss values and their local derivatives
pub(crate) struct ItemLosses {
    /// One value per item
    pub values: Vec<f32>,
    /// Shape of the unreduced result
    pub item_shape: Vec<usize>,
    /// d item / d prediction, one entry per prediction element
    pub local_grad: Array1<f32>,
    /// Item each prediction element contributes to; `None` means element `j`
    /// belongs to item `j`
    pub owner: Option<Vec<usize>>,
}

impl ItemLosses {
    /// Element-wise loss: one item per prediction element
    pub fn elementwise(predictions: &Tensor, values: Vec<f32>, local_grad: Array1<f32>) -> Self {
        Self { values, item_shape: predictions.shape().to_vec(), local_grad, owner: None }
    }

    /// Multiply every item (and its derivatives) by a constant per-item weight
    pub fn weight_items(&mut self, weights: &[f32]) {
        assert_eq!(weights.len(), self.values.len(), "One weight per item required");
        for (v, w) in self.values.iter_mut().zip(weights) {
            *v *= w;
        }
        let owner = self.owner.as_ref();
        for (j, g) in self.local_grad.iter_mut().enumerate() {
            *g *= weights[owner.map_or(j, |o| o[j])];
        }
    }

    /// Reduce into a tensor wired to `predictions`
    pub fn reduce(self, predictions: &Tensor, reduction: Reduction) -> Tensor {
        let n_items = self.values.len();
        let (mut result, factor) = match reduction {
            Reduction::None => (Tensor::from_shape_vec(&self.item_shape, self.values, false), 1.0),
            Reduction::Sum => (Tensor::scalar(self.values.iter().sum()), 1.0),
            Reduction::Mean => {
                let factor = 1.0 / n_items.max(1) as f32;
                (Tensor::scalar(self.values.iter().sum::<f32>() * factor), factor)
            }
        };

        if predictions.requires_grad() {
            result.set_requires_grad(true);
            let backward_op = Rc::new(ReducedLossBackward {
                predictions: predictions.clone(),
                local_grad: self.local_grad * factor,
                owner: self.owner,
                per_item: reduction == Reduction::None,
                result_grad: result.grad_cell(),
            });
            result.set_backward_op(backward_op);
        }

        result
    }
}

struct ReducedLossBackward {
    predictions: Tensor,
    local_grad: Array1<f32>,
    owner: Option<Vec<usize>>,
    per_item: bool,
    result_grad: GradCell,
}

impl BackwardOp for ReducedLossBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            let grad_pred: Array1<f32> = if self.per_item {
                self.local_grad
                    .iter()
                    .enumerate()
                    .map(|(j, &g)| {
                        let item = self.owner.as_ref().map_or(j, |o| o[j]);
                        g * grad[item]
                    })
                    .collect()
            } else {
                &self.local_grad * grad[0]
            };
            self.predictions.accumulate_grad(grad_pred);
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.predictions.clone()]
    }
}

pub(crate) fn assert_same_len(predictions: &Tensor, targets: &Tensor) {
    assert_eq!(
        predictions.len(),
        targets.len(),
        "Predictions and targets must have same length"
    );
}

//! Gradient reversal
//!
//! Identity on the forward pass; on the backward pass the incoming gradient
//! is negated and scaled by λ. Placing it between a feature extractor and an
//! adversary trains the extractor to remove whatever the adversary predicts.

use crate::autograd::{BackwardOp, GradCell, Tensor};
use std::rc::Rc;

/// Identity forward, `-lambda * grad` backward
pub fn grad_reverse(features: &Tensor, lambda: f32) -> Tensor {
    let requires_grad = features.requires_grad();
    let mut result =
        Tensor::new(features.data().clone(), requires_grad).with_shape(features.shape());

    if requires_grad {
        let backward_op = Rc::new(GradReverseBackward {
            a: features.clone(),
            lambda,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

/// [`grad_reverse`] with λ = 1
pub fn grad_reverse_default(features: &Tensor) -> Tensor {
    grad_reverse(features, 1.0)
}

struct GradReverseBackward {
    a: Tensor,
    lambda: f32,
    result_grad: GradCell,
}

impl BackwardOp for GradReverseBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                self.a.accumulate_grad(grad * -self.lambda);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

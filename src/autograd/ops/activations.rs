//! Element-wise activation operations: relu, sigmoid, softplus, exp, ln

use crate::autograd::{BackwardOp, GradCell, Tensor};
use ndarray::Array1;
use std::rc::Rc;

/// Unary element-wise op whose local derivative depends on input and output
struct ElementwiseBackward {
    a: Tensor,
    output: Array1<f32>,
    derivative: fn(f32, f32) -> f32,
    result_grad: GradCell,
}

impl BackwardOp for ElementwiseBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let local: Array1<f32> = self
                    .a
                    .data()
                    .iter()
                    .zip(self.output.iter())
                    .map(|(&x, &y)| (self.derivative)(x, y))
                    .collect();
                self.a.accumulate_grad(grad * &local);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

fn elementwise(a: &Tensor, forward: fn(f32) -> f32, derivative: fn(f32, f32) -> f32) -> Tensor {
    let data = a.data().mapv(forward);
    let requires_grad = a.requires_grad();

    let mut result = Tensor::new(data.clone(), requires_grad).with_shape(a.shape());

    if requires_grad {
        let backward_op = Rc::new(ElementwiseBackward {
            a: a.clone(),
            output: data,
            derivative,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

/// ReLU activation
pub fn relu(a: &Tensor) -> Tensor {
    elementwise(a, |x| x.max(0.0), |x, _| if x > 0.0 { 1.0 } else { 0.0 })
}

/// Logistic sigmoid
pub fn sigmoid(a: &Tensor) -> Tensor {
    elementwise(a, |x| 1.0 / (1.0 + (-x).exp()), |_, y| y * (1.0 - y))
}

/// Softplus: ln(1 + e^x), linear above 20 like the usual threshold
pub fn softplus(a: &Tensor) -> Tensor {
    elementwise(
        a,
        |x| if x > 20.0 { x } else { x.exp().ln_1p() },
        |x, _| 1.0 / (1.0 + (-x).exp()),
    )
}

/// Exponential
pub fn exp(a: &Tensor) -> Tensor {
    elementwise(a, f32::exp, |_, y| y)
}

/// Natural logarithm
pub fn ln(a: &Tensor) -> Tensor {
    elementwise(a, f32::ln, |x, _| 1.0 / x)
}

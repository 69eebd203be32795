//! Basic autograd operations: add, sub, mul, scale, shift, sum, mean

use crate::autograd::{BackwardOp, GradCell, Tensor};
use ndarray::Array1;
use std::rc::Rc;

fn assert_same_len(a: &Tensor, b: &Tensor) {
    assert_eq!(a.len(), b.len(), "Tensors must have same length ({} vs {})", a.len(), b.len());
}

/// Add two tensors
pub fn add(a: &Tensor, b: &Tensor) -> Tensor {
    add_scaled(a, b, 1.0)
}

/// Subtract `b` from `a`
pub fn sub(a: &Tensor, b: &Tensor) -> Tensor {
    add_scaled(a, b, -1.0)
}

/// Compute `a + factor * b`
pub fn add_scaled(a: &Tensor, b: &Tensor, factor: f32) -> Tensor {
    assert_same_len(a, b);
    let data = a.data() + &(b.data() * factor);
    let requires_grad = a.requires_grad() || b.requires_grad();

    let mut result = Tensor::new(data, requires_grad).with_shape(a.shape());

    if requires_grad {
        let backward_op = Rc::new(AddScaledBackward {
            a: a.clone(),
            b: b.clone(),
            factor,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct AddScaledBackward {
    a: Tensor,
    b: Tensor,
    factor: f32,
    result_grad: GradCell,
}

impl BackwardOp for AddScaledBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                self.a.accumulate_grad(grad.clone());
            }
            if self.b.requires_grad() {
                self.b.accumulate_grad(grad * self.factor);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}

/// Multiply two tensors element-wise
pub fn mul(a: &Tensor, b: &Tensor) -> Tensor {
    assert_same_len(a, b);
    let data = a.data() * b.data();
    let requires_grad = a.requires_grad() || b.requires_grad();

    let mut result = Tensor::new(data, requires_grad).with_shape(a.shape());

    if requires_grad {
        let backward_op = Rc::new(MulBackward {
            a: a.clone(),
            b: b.clone(),
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct MulBackward {
    a: Tensor,
    b: Tensor,
    result_grad: GradCell,
}

impl BackwardOp for MulBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                // ∂L/∂a = ∂L/∂out * b
                self.a.accumulate_grad(grad * self.b.data());
            }
            if self.b.requires_grad() {
                // ∂L/∂b = ∂L/∂out * a
                self.b.accumulate_grad(grad * self.a.data());
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}

/// Scale tensor by a scalar
pub fn scale(a: &Tensor, factor: f32) -> Tensor {
    let data = a.data() * factor;
    let requires_grad = a.requires_grad();

    let mut result = Tensor::new(data, requires_grad).with_shape(a.shape());

    if requires_grad {
        let backward_op =
            Rc::new(ScaleBackward { a: a.clone(), factor, result_grad: result.grad_cell() });
        result.set_backward_op(backward_op);
    }

    result
}

struct ScaleBackward {
    a: Tensor,
    factor: f32,
    result_grad: GradCell,
}

impl BackwardOp for ScaleBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                self.a.accumulate_grad(grad * self.factor);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

/// Add a constant to every element
pub fn shift(a: &Tensor, offset: f32) -> Tensor {
    let data = a.data() + offset;
    let requires_grad = a.requires_grad();

    let mut result = Tensor::new(data, requires_grad).with_shape(a.shape());

    if requires_grad {
        let backward_op =
            Rc::new(PassThroughBackward { a: a.clone(), result_grad: result.grad_cell() });
        result.set_backward_op(backward_op);
    }

    result
}

/// Gradient flows to the input unchanged (shift, reshape)
pub(crate) struct PassThroughBackward {
    pub(crate) a: Tensor,
    pub(crate) result_grad: GradCell,
}

impl BackwardOp for PassThroughBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                self.a.accumulate_grad(grad.clone());
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

/// Sum all elements
pub fn sum(a: &Tensor) -> Tensor {
    reduce_all(a, 1.0)
}

/// Mean of all elements
pub fn mean(a: &Tensor) -> Tensor {
    reduce_all(a, 1.0 / a.len().max(1) as f32)
}

fn reduce_all(a: &Tensor, factor: f32) -> Tensor {
    let data = Array1::from(vec![a.data().sum() * factor]);
    let requires_grad = a.requires_grad();

    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        let backward_op =
            Rc::new(SumBackward { a: a.clone(), factor, result_grad: result.grad_cell() });
        result.set_backward_op(backward_op);
    }

    result
}

struct SumBackward {
    a: Tensor,
    factor: f32,
    result_grad: GradCell,
}

impl BackwardOp for SumBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                // ∂L/∂a_i = ∂L/∂sum * factor (broadcast)
                self.a.accumulate_grad(Array1::from_elem(self.a.len(), grad[0] * self.factor));
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

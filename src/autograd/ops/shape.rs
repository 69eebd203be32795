//! Shape operations: reshape, column slicing, row sums

use super::basic::PassThroughBackward;
use crate::autograd::{BackwardOp, GradCell, Tensor};
use ndarray::Array1;
use std::ops::Range;
use std::rc::Rc;

/// Reinterpret the tensor with a new shape; gradients pass straight through
pub fn reshape(a: &Tensor, shape: &[usize]) -> Tensor {
    let requires_grad = a.requires_grad();
    let mut result = Tensor::new(a.data().clone(), requires_grad).with_shape(shape);

    if requires_grad {
        let backward_op =
            Rc::new(PassThroughBackward { a: a.clone(), result_grad: result.grad_cell() });
        result.set_backward_op(backward_op);
    }

    result
}

/// Select columns `cols` of a tensor viewed as `(batch, rest)`
///
/// The result has shape `(batch, cols.len())`.
pub fn slice_cols(a: &Tensor, cols: Range<usize>) -> Tensor {
    let rows = a.batch_size();
    let width = a.sample_len();
    assert!(
        cols.start <= cols.end && cols.end <= width,
        "Column range {cols:?} out of bounds for width {width}"
    );

    let out_width = cols.len();
    let mut data = Vec::with_capacity(rows * out_width);
    for r in 0..rows {
        let row = r * width;
        data.extend_from_slice(&a.as_slice()[row + cols.start..row + cols.end]);
    }

    let requires_grad = a.requires_grad();
    let mut result = Tensor::from_shape_vec(&[rows, out_width], data, requires_grad);

    if requires_grad {
        let backward_op = Rc::new(SliceColsBackward {
            a: a.clone(),
            cols,
            rows,
            width,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct SliceColsBackward {
    a: Tensor,
    cols: Range<usize>,
    rows: usize,
    width: usize,
    result_grad: GradCell,
}

impl BackwardOp for SliceColsBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let out_width = self.cols.len();
                let mut grad_a = Array1::zeros(self.rows * self.width);
                for r in 0..self.rows {
                    for c in 0..out_width {
                        grad_a[r * self.width + self.cols.start + c] = grad[r * out_width + c];
                    }
                }
                self.a.accumulate_grad(grad_a);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

/// Sum each batch entry: `(batch, rest) -> (batch,)`
pub fn sum_rows(a: &Tensor) -> Tensor {
    let rows = a.batch_size();
    let width = a.sample_len();
    let data: Vec<f32> =
        (0..rows).map(|r| a.as_slice()[r * width..(r + 1) * width].iter().sum()).collect();

    let requires_grad = a.requires_grad();
    let mut result = Tensor::from_shape_vec(&[rows], data, requires_grad);

    if requires_grad {
        let backward_op =
            Rc::new(SumRowsBackward { a: a.clone(), width, result_grad: result.grad_cell() });
        result.set_backward_op(backward_op);
    }

    result
}

struct SumRowsBackward {
    a: Tensor,
    width: usize,
    result_grad: GradCell,
}

impl BackwardOp for SumRowsBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let grad_a: Array1<f32> = (0..self.a.len()).map(|i| grad[i / self.width]).collect();
                self.a.accumulate_grad(grad_a);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

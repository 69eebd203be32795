//! Matrix multiplication and bias broadcast
//!
//! Matrices are row-major and flattened; dimensions are passed explicitly and
//! the result carries a `[m, n]` shape.

use crate::autograd::{BackwardOp, GradCell, Tensor};
use ndarray::{Array1, ArrayView2, Axis};
use std::rc::Rc;

/// Transpose a row-major matrix (rows x cols) to (cols x rows)
pub fn transpose(data: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let view = ArrayView2::from_shape((rows, cols), data).expect("transpose dimensions mismatch");
    view.t().iter().copied().collect()
}

/// Compute C = A @ B on flattened row-major buffers
pub fn matmul_compute(a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Vec<f32> {
    let a = ArrayView2::from_shape((m, k), a).expect("matrix A dimensions mismatch");
    let b = ArrayView2::from_shape((k, n), b).expect("matrix B dimensions mismatch");
    a.dot(&b).iter().copied().collect()
}

/// Matrix multiplication
///
/// Computes C = A @ B where:
/// - A is m×k (flattened to length m*k)
/// - B is k×n (flattened to length k*n)
/// - C is m×n (flattened to length m*n)
pub fn matmul(a: &Tensor, b: &Tensor, m: usize, k: usize, n: usize) -> Tensor {
    assert_eq!(a.len(), m * k, "Matrix A size mismatch");
    assert_eq!(b.len(), k * n, "Matrix B size mismatch");

    let result_data = matmul_compute(a.as_slice(), b.as_slice(), m, k, n);

    let requires_grad = a.requires_grad() || b.requires_grad();
    let mut result = Tensor::new(Array1::from(result_data), requires_grad).with_shape(&[m, n]);

    if requires_grad {
        let backward_op = Rc::new(MatmulBackward {
            a: a.clone(),
            b: b.clone(),
            m,
            k,
            n,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct MatmulBackward {
    a: Tensor,
    b: Tensor,
    m: usize,
    k: usize,
    n: usize,
    result_grad: GradCell,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self) {
        if let Some(grad_output) = self.result_grad.borrow().as_ref() {
            let grad_c = grad_output.as_slice().expect("gradient output must be contiguous");

            if self.a.requires_grad() {
                // grad_A = grad_C @ B^T : (m, n) @ (n, k)
                let b_t = transpose(self.b.as_slice(), self.k, self.n);
                let grad_a = matmul_compute(grad_c, &b_t, self.m, self.n, self.k);
                self.a.accumulate_grad(Array1::from(grad_a));
            }

            if self.b.requires_grad() {
                // grad_B = A^T @ grad_C : (k, m) @ (m, n)
                let a_t = transpose(self.a.as_slice(), self.m, self.k);
                let grad_b = matmul_compute(&a_t, grad_c, self.k, self.m, self.n);
                self.b.accumulate_grad(Array1::from(grad_b));
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}

/// Add a length-`cols` bias to every row of a (rows x cols) matrix
pub fn bias_add(x: &Tensor, bias: &Tensor, rows: usize, cols: usize) -> Tensor {
    assert_eq!(x.len(), rows * cols, "Input size mismatch");
    assert_eq!(bias.len(), cols, "Bias size mismatch");

    let mut data = x.data().clone();
    for (i, v) in data.iter_mut().enumerate() {
        *v += bias.data()[i % cols];
    }

    let requires_grad = x.requires_grad() || bias.requires_grad();
    let mut result = Tensor::new(data, requires_grad).with_shape(x.shape());

    if requires_grad {
        let backward_op = Rc::new(BiasAddBackward {
            x: x.clone(),
            bias: bias.clone(),
            rows,
            cols,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct BiasAddBackward {
    x: Tensor,
    bias: Tensor,
    rows: usize,
    cols: usize,
    result_grad: GradCell,
}

impl BackwardOp for BiasAddBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.x.requires_grad() {
                self.x.accumulate_grad(grad.clone());
            }
            if self.bias.requires_grad() {
                let grad_2d = grad
                    .view()
                    .into_shape_with_order((self.rows, self.cols))
                    .expect("bias gradient dimensions");
                self.bias.accumulate_grad(grad_2d.sum_axis(Axis(0)));
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.x.clone(), self.bias.clone()]
    }
}

//! Autograd operations with backward passes

mod activations;
mod basic;
mod matmul;
mod reversal;
mod shape;

pub use activations::{exp, ln, relu, sigmoid, softplus};
pub use basic::{add, add_scaled, mean, mul, scale, shift, sub, sum};
pub use matmul::{bias_add, matmul, matmul_compute, transpose};
pub use reversal::{grad_reverse, grad_reverse_default};
pub use shape::{reshape, slice_cols, sum_rows};

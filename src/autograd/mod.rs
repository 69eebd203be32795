//! Tape-based autograd engine
//!
//! Every differentiable op returns a [`Tensor`] carrying a [`BackwardOp`] that
//! knows its inputs. [`backward`] orders the reachable ops topologically and
//! runs each once, so tensors consumed by several ops receive the sum of
//! their contributions.
//!
//! ```
//! use agrupar::autograd::{backward, mul, sum, Tensor};
//!
//! let x = Tensor::from_vec(vec![1.0, 2.0], true);
//! let mut y = sum(&mul(&x, &x));
//! backward(&mut y, None);
//! assert_eq!(x.grad().unwrap().to_vec(), vec![2.0, 4.0]);
//! ```

mod backward;
mod ops;
mod tensor;

#[cfg(test)]
mod tests;

pub use backward::{backward, grad, BackwardOp};
pub use ops::*;
pub use tensor::{GradCell, Tensor};

//! Tensor with gradient tracking
//!
//! Storage is a flat `Array1<f32>` in row-major order; `shape` is metadata
//! used by ops that need to know the batch or class layout. Cloning a tensor
//! copies its data but shares the gradient cell and the backward op, so a
//! clone held inside a backward op accumulates into the original's gradient.

use super::BackwardOp;
use ndarray::Array1;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Gradient storage shared between a tensor and its clones
pub type GradCell = Rc<RefCell<Option<Array1<f32>>>>;

/// Tensor with optional gradient tracking
#[derive(Clone)]
pub struct Tensor {
    data: Array1<f32>,
    shape: Vec<usize>,
    grad: GradCell,
    backward_op: Option<Rc<dyn BackwardOp>>,
    requires_grad: bool,
}

impl Tensor {
    /// Create a 1-D tensor from an array
    pub fn new(data: Array1<f32>, requires_grad: bool) -> Self {
        let shape = vec![data.len()];
        Self { data, shape, grad: Rc::new(RefCell::new(None)), backward_op: None, requires_grad }
    }

    /// Create a 1-D tensor from a vector
    pub fn from_vec(data: Vec<f32>, requires_grad: bool) -> Self {
        Self::new(Array1::from(data), requires_grad)
    }

    /// Create a tensor with an explicit shape
    ///
    /// # Panics
    ///
    /// Panics if the product of `shape` differs from `data.len()`.
    pub fn from_shape_vec(shape: &[usize], data: Vec<f32>, requires_grad: bool) -> Self {
        Self::from_vec(data, requires_grad).with_shape(shape)
    }

    /// Create a 1-D tensor of zeros
    pub fn zeros(len: usize, requires_grad: bool) -> Self {
        Self::new(Array1::zeros(len), requires_grad)
    }

    /// Create a 1-D tensor of ones
    pub fn ones(len: usize, requires_grad: bool) -> Self {
        Self::new(Array1::ones(len), requires_grad)
    }

    /// Create a single-element tensor that never tracks gradients
    pub fn scalar(value: f32) -> Self {
        Self::from_vec(vec![value], false)
    }

    /// Replace the shape metadata without touching the data or the graph
    ///
    /// # Panics
    ///
    /// Panics if the element count does not match.
    pub fn with_shape(mut self, shape: &[usize]) -> Self {
        let numel: usize = shape.iter().product();
        assert_eq!(
            numel,
            self.data.len(),
            "Shape {shape:?} does not match {} elements",
            self.data.len()
        );
        self.shape = shape.to_vec();
        self
    }

    /// Get the data
    pub fn data(&self) -> &Array1<f32> {
        &self.data
    }

    /// Get mutable data
    pub fn data_mut(&mut self) -> &mut Array1<f32> {
        &mut self.data
    }

    /// Data as a contiguous slice
    pub fn as_slice(&self) -> &[f32] {
        self.data.as_slice().expect("tensor storage is contiguous")
    }

    /// Logical shape
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Size of the leading (batch) dimension
    pub fn batch_size(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Number of elements per batch entry
    pub fn sample_len(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value of a single-element tensor
    ///
    /// # Panics
    ///
    /// Panics if the tensor does not hold exactly one element.
    pub fn item(&self) -> f32 {
        assert_eq!(self.data.len(), 1, "item() requires a single-element tensor");
        self.data[0]
    }

    /// Check if gradient is required
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Enable or disable gradient tracking for this handle
    pub fn set_requires_grad(&mut self, requires_grad: bool) {
        self.requires_grad = requires_grad;
    }

    /// Get a copy of the gradient
    pub fn grad(&self) -> Option<Array1<f32>> {
        self.grad.borrow().clone()
    }

    /// Overwrite the gradient
    pub fn set_grad(&self, grad: Array1<f32>) {
        *self.grad.borrow_mut() = Some(grad);
    }

    /// Clear the gradient
    pub fn zero_grad(&self) {
        *self.grad.borrow_mut() = None;
    }

    /// Add to the gradient, initialising it on first use
    pub fn accumulate_grad(&self, grad: Array1<f32>) {
        let mut cell = self.grad.borrow_mut();
        match cell.as_mut() {
            Some(existing) => *existing += &grad,
            None => *cell = Some(grad),
        }
    }

    /// Shared gradient cell
    pub fn grad_cell(&self) -> GradCell {
        self.grad.clone()
    }

    /// Backward op that produced this tensor
    pub fn backward_op(&self) -> Option<Rc<dyn BackwardOp>> {
        self.backward_op.clone()
    }

    /// Attach the backward op that produced this tensor
    pub fn set_backward_op(&mut self, op: Rc<dyn BackwardOp>) {
        self.backward_op = Some(op);
    }

    /// Copy of the data cut off from the graph
    ///
    /// The result has a fresh gradient cell, no backward op and does not
    /// require gradients.
    pub fn detach(&self) -> Self {
        Self {
            data: self.data.clone(),
            shape: self.shape.clone(),
            grad: Rc::new(RefCell::new(None)),
            backward_op: None,
            requires_grad: false,
        }
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("requires_grad", &self.requires_grad)
            .field("has_grad", &self.grad.borrow().is_some())
            .field("has_backward_op", &self.backward_op.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_shape_vec() {
        let t = Tensor::from_shape_vec(&[2, 3], vec![0.0; 6], false);
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.batch_size(), 2);
        assert_eq!(t.sample_len(), 3);
        assert_eq!(t.ndim(), 2);
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_with_shape_mismatch() {
        let _ = Tensor::from_vec(vec![1.0, 2.0, 3.0], false).with_shape(&[2, 2]);
    }

    #[test]
    fn test_clone_shares_grad() {
        let t = Tensor::from_vec(vec![1.0, 2.0], true);
        let c = t.clone();
        c.accumulate_grad(ndarray::arr1(&[1.0, 1.0]));
        assert_eq!(t.grad().expect("shared grad").to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_detach_cuts_grad() {
        let t = Tensor::from_vec(vec![1.0, 2.0], true);
        let d = t.detach();
        assert!(!d.requires_grad());
        d.accumulate_grad(ndarray::arr1(&[5.0, 5.0]));
        assert!(t.grad().is_none());
        assert_eq!(d.data(), t.data());
    }

    #[test]
    fn test_zero_grad() {
        let t = Tensor::from_vec(vec![1.0], true);
        t.set_grad(ndarray::arr1(&[3.0]));
        t.zero_grad();
        assert!(t.grad().is_none());
    }

    #[test]
    fn test_item() {
        assert_eq!(Tensor::scalar(4.5).item(), 4.5);
    }
}

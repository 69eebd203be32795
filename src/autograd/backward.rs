//! Backward pass: tape nodes and graph traversal

use super::Tensor;
use ndarray::Array1;
use std::collections::HashSet;
use std::rc::Rc;

/// A node on the gradient tape
///
/// `backward` reads the gradient accumulated in the node's own result cell
/// and adds the local contribution to each input that requires gradients.
/// It must not recurse; [`backward`] visits every node exactly once, after all
/// of its consumers.
pub trait BackwardOp {
    /// Propagate this node's result gradient to its inputs
    fn backward(&self);

    /// Inputs this node propagates into
    fn inputs(&self) -> Vec<Tensor>;
}

fn node_id(op: &Rc<dyn BackwardOp>) -> usize {
    Rc::as_ptr(op) as *const () as usize
}

/// Nodes reachable from `root`, ordered so every node precedes its inputs
fn tape_order(root: &Rc<dyn BackwardOp>) -> Vec<Rc<dyn BackwardOp>> {
    fn visit(
        op: &Rc<dyn BackwardOp>,
        seen: &mut HashSet<usize>,
        order: &mut Vec<Rc<dyn BackwardOp>>,
    ) {
        if !seen.insert(node_id(op)) {
            return;
        }
        for input in op.inputs() {
            if let Some(child) = input.backward_op() {
                visit(&child, seen, order);
            }
        }
        order.push(op.clone());
    }

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    visit(root, &mut seen, &mut order);
    order.reverse();
    order
}

/// Perform backward pass on a tensor
///
/// Seeds the tensor's gradient with `grad_output` (ones when `None`) and runs
/// every reachable backward op once in reverse topological order.
pub fn backward(tensor: &mut Tensor, grad_output: Option<Array1<f32>>) {
    let seed = grad_output.unwrap_or_else(|| Array1::ones(tensor.len()));
    assert_eq!(seed.len(), tensor.len(), "Seed gradient length mismatch");
    tensor.set_grad(seed);

    if let Some(root) = tensor.backward_op() {
        for op in tape_order(&root) {
            op.backward();
        }
    }
}

/// Gradient of `output` (seeded with ones) with respect to each of `inputs`
///
/// Returns `None` for an input the output does not depend on. Gradients also
/// accumulate into any parameter on the path from the inputs to `output`.
pub fn grad(output: &Tensor, inputs: &[Tensor]) -> Vec<Option<Array1<f32>>> {
    let mut output = output.clone();
    backward(&mut output, None);
    inputs.iter().map(Tensor::grad).collect()
}

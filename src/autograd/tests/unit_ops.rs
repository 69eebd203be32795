//! Unit tests for autograd operations (forward and backward)

use super::test_utils::numerical_grad_of_sum;
use crate::autograd::{
    add, add_scaled, backward, exp, grad, ln, matmul, mean, mul, relu, scale, sigmoid, softplus,
    sub, sum, Tensor,
};
use approx::assert_abs_diff_eq;

#[test]
fn test_tensor_creation() {
    let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
    assert_eq!(t.len(), 3);
    assert!(t.requires_grad());
    assert!(t.grad().is_none());
}

#[test]
fn test_tensor_grad_accumulation() {
    let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);

    t.accumulate_grad(ndarray::arr1(&[1.0, 1.0, 1.0]));
    assert_eq!(t.grad().expect("gradient should be available")[0], 1.0);

    t.accumulate_grad(ndarray::arr1(&[1.0, 1.0, 1.0]));
    assert_eq!(t.grad().expect("gradient should be available")[0], 2.0);
}

#[test]
fn test_add_sub_backward() {
    let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
    let b = Tensor::from_vec(vec![4.0, 5.0, 6.0], true);
    let mut c = sub(&add(&a, &b), &b);
    assert_eq!(c.as_slice(), a.as_slice());

    backward(&mut c, None);
    assert_eq!(a.grad().expect("grad a").to_vec(), vec![1.0; 3]);
    // b enters twice with opposite signs
    assert_eq!(b.grad().expect("grad b").to_vec(), vec![0.0; 3]);
}

#[test]
fn test_add_scaled_backward() {
    let a = Tensor::from_vec(vec![1.0, 1.0], true);
    let b = Tensor::from_vec(vec![2.0, 4.0], true);
    let mut c = add_scaled(&a, &b, 0.5);
    assert_eq!(c.as_slice(), &[2.0, 3.0]);

    backward(&mut c, None);
    assert_eq!(b.grad().expect("grad b").to_vec(), vec![0.5, 0.5]);
}

#[test]
fn test_shared_node_is_visited_once() {
    // y = x*x + x*x: the product node feeds both sides of the sum
    let x = Tensor::from_vec(vec![3.0], true);
    let sq = mul(&x, &x);
    let mut y = add(&sq, &sq);
    assert_abs_diff_eq!(y.item(), 18.0);

    backward(&mut y, None);
    assert_abs_diff_eq!(x.grad().expect("grad")[0], 12.0);
}

#[test]
fn test_mean_and_scale() {
    let x = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], true);
    let mut m = mean(&scale(&x, 2.0));
    assert_abs_diff_eq!(m.item(), 5.0);

    backward(&mut m, None);
    for g in x.grad().expect("grad").iter() {
        assert_abs_diff_eq!(*g, 0.5);
    }
}

#[test]
fn test_relu_forward_backward() {
    let x = Tensor::from_vec(vec![-1.0, 0.0, 2.0], true);
    let mut y = sum(&relu(&x));
    assert_abs_diff_eq!(y.item(), 2.0);

    backward(&mut y, None);
    assert_eq!(x.grad().expect("grad").to_vec(), vec![0.0, 0.0, 1.0]);
}

#[test]
fn test_unary_gradients_match_finite_difference() {
    let xs = vec![-1.5, -0.2, 0.3, 1.7];
    let ops: [(fn(&Tensor) -> Tensor, &str); 3] =
        [(sigmoid, "sigmoid"), (softplus, "softplus"), (exp, "exp")];

    for (op, name) in ops {
        let x = Tensor::from_vec(xs.clone(), true);
        let mut y = sum(&op(&x));
        backward(&mut y, None);
        let analytical = x.grad().expect("grad");

        let numerical = numerical_grad_of_sum(op, &xs, 1e-3);
        for i in 0..xs.len() {
            assert!(
                (analytical[i] - numerical[i]).abs() < 1e-2,
                "{name} mismatch at {i}: {} vs {}",
                analytical[i],
                numerical[i]
            );
        }
    }
}

#[test]
fn test_ln_backward() {
    let x = Tensor::from_vec(vec![0.5, 2.0], true);
    let mut y = sum(&ln(&x));
    backward(&mut y, None);
    let g = x.grad().expect("grad");
    assert_abs_diff_eq!(g[0], 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(g[1], 0.5, epsilon = 1e-6);
}

#[test]
fn test_softplus_large_input_is_linear() {
    let x = Tensor::from_vec(vec![50.0], false);
    assert_abs_diff_eq!(softplus(&x).item(), 50.0);
}

#[test]
fn test_grad_returns_input_gradients() {
    let x = Tensor::from_shape_vec(&[1, 2], vec![1.0, 2.0], true);
    let w = Tensor::from_vec(vec![3.0, 4.0], true);
    let y = sum(&matmul(&x, &w, 1, 2, 1));

    let grads = grad(&y, &[x.clone(), w.clone()]);
    assert_eq!(grads[0].as_ref().expect("grad x").to_vec(), vec![3.0, 4.0]);
    assert_eq!(grads[1].as_ref().expect("grad w").to_vec(), vec![1.0, 2.0]);
}

#[test]
fn test_grad_of_unrelated_input_is_none() {
    let x = Tensor::from_vec(vec![1.0], true);
    let unrelated = Tensor::from_vec(vec![1.0], true);
    let y = sum(&x);
    let grads = grad(&y, &[unrelated]);
    assert!(grads[0].is_none());
}

#[test]
fn test_detach_cuts_graph() {
    let x = Tensor::from_vec(vec![2.0], true);
    let d = mul(&x, &x).detach();
    assert!(!d.requires_grad());
    assert!(d.backward_op().is_none());
    assert_abs_diff_eq!(d.item(), 4.0);
}

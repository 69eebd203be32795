//! Property-based gradient checks (mul, sigmoid, matmul, reversal)

use super::test_utils::numerical_grad_of_sum;
use crate::autograd::{backward, grad_reverse, matmul, mul, sigmoid, sum, Tensor};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_mul_backward_gradient_check(
        xy in prop::collection::vec((-5.0f32..5.0, -5.0f32..5.0), 2..20)
    ) {
        let (x, y): (Vec<f32>, Vec<f32>) = xy.into_iter().unzip();

        let a = Tensor::from_vec(x.clone(), true);
        let b = Tensor::from_vec(y.clone(), false);
        let mut c = sum(&mul(&a, &b));
        backward(&mut c, None);

        let analytical = a.grad().expect("gradient should be available");
        let numerical = numerical_grad_of_sum(|t| mul(t, &b), &x, 1e-3);

        for i in 0..x.len() {
            let diff = (analytical[i] - numerical[i]).abs();
            prop_assert!(
                diff < 0.1,
                "Gradient mismatch at {}: {} vs {}",
                i,
                analytical[i],
                numerical[i]
            );
        }
    }

    #[test]
    fn prop_sigmoid_output_in_unit_interval(x in prop::collection::vec(-30.0f32..30.0, 1..32)) {
        let y = sigmoid(&Tensor::from_vec(x, false));
        for v in y.data().iter() {
            prop_assert!((0.0..=1.0).contains(v));
        }
    }

    #[test]
    fn prop_matmul_backward_gradient_check(
        a in prop::collection::vec(-2.0f32..2.0, 6),
        b in prop::collection::vec(-2.0f32..2.0, 6),
    ) {
        let ta = Tensor::from_vec(a.clone(), true);
        let tb = Tensor::from_vec(b.clone(), false);
        let mut c = sum(&matmul(&ta, &tb, 2, 3, 2));
        backward(&mut c, None);

        let analytical = ta.grad().expect("gradient should be available");
        let numerical = numerical_grad_of_sum(|t| matmul(t, &tb, 2, 3, 2), &a, 1e-3);

        for i in 0..a.len() {
            prop_assert!((analytical[i] - numerical[i]).abs() < 0.05);
        }
    }

    #[test]
    fn prop_reversal_is_identity_forward(
        x in prop::collection::vec(-100.0f32..100.0, 1..32),
        lambda in 0.0f32..5.0,
    ) {
        let t = Tensor::from_vec(x.clone(), true);
        let y = grad_reverse(&t, lambda);
        prop_assert_eq!(y.as_slice(), x.as_slice());
    }

    #[test]
    fn prop_reversal_backward_is_negated_scaled(
        g in prop::collection::vec(-10.0f32..10.0, 1..32),
        lambda in 0.0f32..5.0,
    ) {
        let t = Tensor::from_vec(vec![0.0; g.len()], true);
        let mut y = grad_reverse(&t, lambda);
        backward(&mut y, Some(ndarray::Array1::from(g.clone())));

        let got = t.grad().expect("gradient should be available");
        for (gi, oi) in got.iter().zip(g.iter()) {
            prop_assert!((gi + lambda * oi).abs() < 1e-4);
        }
    }
}

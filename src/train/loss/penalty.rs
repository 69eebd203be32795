//! Contrastive gradient penalty (Mescheder et al., 2018)

use crate::autograd::{backward, grad, BackwardOp, GradCell};
use crate::nn::{Module, Sequential};
use crate::Tensor;
use ndarray::Array1;
use std::rc::Rc;

/// Largest input shift used when differentiating the penalty
const SHIFT: f32 = 1e-2;

/// A network evaluated on one or more inputs
///
/// Only the last output is penalised.
pub trait Critic {
    fn forward(&self, inputs: &[Tensor]) -> Vec<Tensor>;

    /// Parameters the penalty is differentiated with respect to
    ///
    /// A critic exposing none yields a constant penalty.
    fn parameters(&self) -> Vec<&Tensor> {
        Vec::new()
    }
}

impl<F> Critic for F
where
    F: Fn(&[Tensor]) -> Vec<Tensor>,
{
    fn forward(&self, inputs: &[Tensor]) -> Vec<Tensor> {
        self(inputs)
    }
}

impl Critic for Sequential {
    fn forward(&self, inputs: &[Tensor]) -> Vec<Tensor> {
        vec![Module::forward(self, &inputs[0])]
    }

    fn parameters(&self) -> Vec<&Tensor> {
        Module::parameters(self)
    }
}

/// `penalty_amount · mean_n ‖∂ out / ∂ x_n‖²`
///
/// Inputs are detached and re-enabled for gradient tracking before the
/// network runs. The gradient of the last network output (seeded with ones)
/// is taken with respect to the first input and flattened per sample. An
/// input the network ignores contributes a zero gradient.
///
/// The gradients already held by the critic's parameters are left as they
/// were. When the critic exposes trainable parameters the result is wired to
/// them: with `F` the summed output and `G` the input gradient,
/// `∂P/∂θ = (2a/N) · ∂(∇ₓF · G)/∂θ`, which is evaluated as the central
/// difference of `∇_θ F` between `x + hG` and `x - hG`. This is exact for
/// critics that are at most quadratic in their input (piecewise between
/// ReLU kinks).
///
/// # Panics
///
/// If `inputs` is empty or the network returns no outputs.
pub fn contrastive_gradient_penalty<C>(
    network: &C,
    inputs: &[Tensor],
    penalty_amount: f32,
) -> Tensor
where
    C: Critic + ?Sized,
{
    assert!(!inputs.is_empty(), "Gradient penalty needs at least one input");

    let params: Vec<Tensor> =
        network.parameters().into_iter().filter(|p| p.requires_grad()).cloned().collect();
    let saved: Vec<Option<Array1<f32>>> = params.iter().map(Tensor::grad).collect();

    let inputs: Vec<Tensor> = inputs
        .iter()
        .map(|x| {
            let mut x = x.detach();
            x.set_requires_grad(true);
            x
        })
        .collect();

    let outputs = network.forward(&inputs);
    let Some(output) = outputs.last() else {
        panic!("Critic returned no outputs");
    };

    let first = &inputs[0];
    let gradient = grad(output, std::slice::from_ref(first))
        .into_iter()
        .next()
        .flatten()
        .unwrap_or_else(|| Array1::zeros(first.len()));

    let rows = first.batch_size().max(1);
    let width = first.len() / rows;
    let total: f32 = gradient
        .as_slice()
        .unwrap_or(&[])
        .chunks(width.max(1))
        .map(|row| row.iter().map(|g| g * g).sum::<f32>())
        .sum();

    let local = (!params.is_empty() && penalty_amount != 0.0).then(|| {
        parameter_gradients(network, &inputs, &gradient, &params, penalty_amount / rows as f32)
    });

    for (param, saved_grad) in params.iter().zip(saved) {
        match saved_grad {
            Some(saved_grad) => param.set_grad(saved_grad),
            None => param.zero_grad(),
        }
    }

    let mut result = Tensor::scalar(total / rows as f32 * penalty_amount);
    if let Some(local) = local {
        result.set_requires_grad(true);
        let backward_op =
            Rc::new(PenaltyBackward { params, local, result_grad: result.grad_cell() });
        result.set_backward_op(backward_op);
    }
    result
}

/// `scale · 2 · ∂(∇ₓF · G)/∂θ` for every parameter
fn parameter_gradients<C>(
    network: &C,
    inputs: &[Tensor],
    gradient: &Array1<f32>,
    params: &[Tensor],
    scale: f32,
) -> Vec<Array1<f32>>
where
    C: Critic + ?Sized,
{
    let max_abs = gradient.iter().fold(0.0f32, |m, g| m.max(g.abs()));
    if max_abs == 0.0 {
        return params.iter().map(|p| Array1::zeros(p.len())).collect();
    }

    let h = SHIFT / max_abs.max(1.0);
    let plus = parameter_grads_at(network, inputs, gradient, h, params);
    let minus = parameter_grads_at(network, inputs, gradient, -h, params);
    // 2 · scale · (plus - minus) / 2h
    let factor = scale / h;
    plus.into_iter().zip(minus).map(|(p, m)| (p - m) * factor).collect()
}

/// `∇_θ F` with the first input moved by `h · direction`
fn parameter_grads_at<C>(
    network: &C,
    inputs: &[Tensor],
    direction: &Array1<f32>,
    h: f32,
    params: &[Tensor],
) -> Vec<Array1<f32>>
where
    C: Critic + ?Sized,
{
    for param in params {
        param.zero_grad();
    }

    let mut shifted: Vec<Tensor> = inputs.iter().map(Tensor::detach).collect();
    let first = &inputs[0];
    shifted[0] = Tensor::new(first.data() + &(direction * h), false).with_shape(first.shape());

    if let Some(output) = network.forward(&shifted).last() {
        let mut output = output.clone();
        backward(&mut output, None);
    }

    params.iter().map(|p| p.grad().unwrap_or_else(|| Array1::zeros(p.len()))).collect()
}

struct PenaltyBackward {
    params: Vec<Tensor>,
    local: Vec<Array1<f32>>,
    result_grad: GradCell,
}

impl BackwardOp for PenaltyBackward {
    fn backward(&self) {
        if let Some(upstream) = self.result_grad.borrow().as_ref() {
            for (param, local) in self.params.iter().zip(&self.local) {
                param.accumulate_grad(local * upstream[0]);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        self.params.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{mul, sum_rows};
    use crate::nn::Linear;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn linear(weight: Vec<f32>, in_features: usize, out_features: usize) -> Linear {
        let mut layer = Linear::new(in_features, out_features, &mut StdRng::seed_from_u64(0));
        layer.weight = Tensor::from_shape_vec(&[in_features, out_features], weight, true);
        layer
    }

    fn two_layer(w1: Vec<f32>, w2: Vec<f32>) -> Sequential {
        Sequential::new().with(linear(w1, 2, 2)).with(linear(w2, 2, 1))
    }

    #[test]
    fn test_linear_critic_penalty() {
        // out_n = x_n · w, so every per-sample gradient is w and the penalty is |w|^2
        let critic = Sequential::new().with(linear(vec![1.0, 2.0, -2.0], 3, 1));
        let x = Tensor::from_shape_vec(&[4, 3], vec![0.5; 12], false);
        let penalty = contrastive_gradient_penalty(&critic, &[x], 0.5);
        assert_relative_eq!(penalty.item(), 0.5 * 9.0, epsilon = 1e-5);
        assert!(penalty.requires_grad());
    }

    #[test]
    fn test_critic_gradients_preserved() {
        let critic = Sequential::new().with(linear(vec![1.0, 2.0], 2, 1));
        let params = Critic::parameters(&critic);
        params[0].set_grad(ndarray::arr1(&[7.0, 7.0]));

        let x = Tensor::from_shape_vec(&[3, 2], vec![0.3; 6], false);
        let _ = contrastive_gradient_penalty(&critic, &[x], 1.0);

        assert_eq!(params[0].grad().expect("kept").to_vec(), vec![7.0, 7.0]);
        assert!(params[1].grad().is_none());
    }

    #[test]
    fn test_penalty_backward_reaches_weights() {
        // P = a |w|^2, so dP/dw = 2 a w and the bias does not matter
        let critic = Sequential::new().with(linear(vec![1.0, 2.0], 2, 1));
        let x = Tensor::from_shape_vec(&[2, 2], vec![0.1, -0.4, 0.8, 0.2], false);
        let mut penalty = contrastive_gradient_penalty(&critic, &[x], 0.5);
        assert_relative_eq!(penalty.item(), 2.5, epsilon = 1e-5);

        backward(&mut penalty, None);
        let params = Critic::parameters(&critic);
        let dw = params[0].grad().expect("weight grad");
        assert_relative_eq!(dw[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(dw[1], 2.0, epsilon = 1e-3);
        assert_relative_eq!(params[1].grad().expect("bias grad")[0], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_penalty_gradient_matches_central_difference() {
        let w1 = vec![0.5, -1.0, 0.8, 0.3];
        let w2 = vec![1.2, -0.7];
        let x = Tensor::from_shape_vec(&[2, 2], vec![0.2, 0.9, -0.5, 0.4], false);

        let critic = two_layer(w1.clone(), w2.clone());
        let mut penalty = contrastive_gradient_penalty(&critic, &[x.clone()], 1.0);
        backward(&mut penalty, None);
        let analytic = Critic::parameters(&critic)[0].grad().expect("grad");

        let h = 1e-2;
        for k in 0..w1.len() {
            let value = |delta: f32| {
                let mut w = w1.clone();
                w[k] += delta;
                contrastive_gradient_penalty(&two_layer(w, w2.clone()), &[x.clone()], 1.0).item()
            };
            let numeric = (value(h) - value(-h)) / (2.0 * h);
            assert_relative_eq!(analytic[k], numeric, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_closure_critic_is_constant() {
        let critic = |xs: &[Tensor]| vec![sum_rows(&mul(&xs[0], &xs[0]))];
        let x = Tensor::from_shape_vec(&[2, 2], vec![1.0, 0.0, 0.0, 2.0], false);
        let penalty = contrastive_gradient_penalty(&critic, &[x], 1.0);
        // rows: |(2, 0)|^2 = 4, |(0, 4)|^2 = 16 -> mean 10
        assert_relative_eq!(penalty.item(), 10.0, epsilon = 1e-5);
        assert!(penalty.backward_op().is_none());
    }

    #[test]
    fn test_only_last_output_counts() {
        let critic = |xs: &[Tensor]| vec![sum_rows(&mul(&xs[0], &xs[0])), sum_rows(&xs[0])];
        let x = Tensor::from_shape_vec(&[1, 3], vec![5.0, 5.0, 5.0], false);
        let penalty = contrastive_gradient_penalty(&critic, &[x], 1.0);
        assert_relative_eq!(penalty.item(), 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_unused_input_gives_zero() {
        let critic = |xs: &[Tensor]| vec![sum_rows(&xs[1])];
        let x = Tensor::from_shape_vec(&[2, 2], vec![1.0; 4], false);
        let y = Tensor::from_shape_vec(&[2, 2], vec![1.0; 4], false);
        let penalty = contrastive_gradient_penalty(&critic, &[x, y], 1.0);
        assert_eq!(penalty.item(), 0.0);
    }

    #[test]
    fn test_caller_tensor_untouched() {
        let critic = |xs: &[Tensor]| vec![sum_rows(&mul(&xs[0], &xs[0]))];
        let x = Tensor::from_shape_vec(&[1, 2], vec![1.0, 1.0], true);
        let _ = contrastive_gradient_penalty(&critic, &[x.clone()], 1.0);
        assert!(x.grad().is_none());
    }
}

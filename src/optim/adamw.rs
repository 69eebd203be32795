//! AdamW optimizer (Adam with decoupled weight decay)

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// AdamW optimizer
///
/// Weight decay is applied directly to the parameters instead of being added
/// to the gradient:
///
/// θ_t = (1 - lr * λ) * θ_{t-1} - lr_t * m_t / (√v_t + ε)
///
/// where `lr_t` folds in the bias correction of both moments.
pub struct AdamW {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    weight_decay: f32,
    t: u64,
    m: Vec<Option<Array1<f32>>>, // First moment
    v: Vec<Option<Array1<f32>>>, // Second moment
}

impl AdamW {
    /// Create a new AdamW optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32, weight_decay: f32) -> Self {
        Self { lr, beta1, beta2, epsilon, weight_decay, t: 0, m: Vec::new(), v: Vec::new() }
    }

    /// Default betas and epsilon with the given learning rate and weight decay
    pub fn with_weight_decay(lr: f32, weight_decay: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8, weight_decay)
    }

    /// Create AdamW with default parameters (weight_decay = 0.01)
    pub fn default_params(lr: f32) -> Self {
        Self::with_weight_decay(lr, 0.01)
    }

    /// Number of steps taken
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.t
    }

    #[must_use]
    pub fn weight_decay(&self) -> f32 {
        self.weight_decay
    }

    /// Advance the step counter and return the bias-corrected learning rate
    fn begin_step(&mut self, n_params: usize) -> f32 {
        if self.m.len() < n_params {
            self.m.resize(n_params, None);
            self.v.resize(n_params, None);
        }
        self.t += 1;
        let t = self.t as i32;
        self.lr * ((1.0 - self.beta2.powi(t)).sqrt() / (1.0 - self.beta1.powi(t)))
    }

    fn update(&mut self, i: usize, param: &mut Tensor, lr_t: f32) {
        let Some(grad) = param.grad() else {
            return;
        };

        // m_t = β1 * m_{t-1} + (1 - β1) * g
        let m_t = match &self.m[i] {
            Some(m) => m * self.beta1 + &grad * (1.0 - self.beta1),
            None => &grad * (1.0 - self.beta1),
        };

        // v_t = β2 * v_{t-1} + (1 - β2) * g²
        let grad_sq = &grad * &grad;
        let v_t = match &self.v[i] {
            Some(v) => v * self.beta2 + &grad_sq * (1.0 - self.beta2),
            None => &grad_sq * (1.0 - self.beta2),
        };

        let adaptive_update = &m_t / &(v_t.mapv(f32::sqrt) + self.epsilon) * lr_t;
        let weight_decay_factor = 1.0 - self.lr * self.weight_decay;
        let updated = param.data() * weight_decay_factor - &adaptive_update;
        *param.data_mut() = updated;

        self.m[i] = Some(m_t);
        self.v[i] = Some(v_t);
    }
}

impl Optimizer for AdamW {
    fn step(&mut self, params: &mut [Tensor]) {
        let lr_t = self.begin_step(params.len());
        for (i, param) in params.iter_mut().enumerate() {
            self.update(i, param, lr_t);
        }
    }

    fn step_refs(&mut self, params: &mut [&mut Tensor]) {
        let lr_t = self.begin_step(params.len());
        for (i, param) in params.iter_mut().enumerate() {
            self.update(i, param, lr_t);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_adamw_quadratic_convergence() {
        // f(x) = x², ∇ = 2x
        let mut params = vec![Tensor::from_vec(vec![5.0, -3.0, 2.0], true)];
        let mut optimizer = AdamW::default_params(0.1);

        for _ in 0..100 {
            let grad = params[0].data().mapv(|x| 2.0 * x);
            params[0].set_grad(grad);
            optimizer.step(&mut params);
        }

        for &val in params[0].data() {
            assert!(val.abs() < 0.5, "Value {val} did not converge");
        }
    }

    #[test]
    fn test_adamw_weight_decay() {
        let mut params = vec![Tensor::from_vec(vec![1.0], true)];
        let mut optimizer = AdamW::new(0.1, 0.9, 0.999, 1e-8, 0.1);

        // Zero gradient - only weight decay applies
        params[0].set_grad(ndarray::arr1(&[0.0]));
        optimizer.step(&mut params);

        // θ_t = (1 - lr * λ) * θ_{t-1} = (1 - 0.1 * 0.1) * 1.0 = 0.99
        assert_abs_diff_eq!(params[0].data()[0], 0.99, epsilon = 1e-6);
    }

    #[test]
    fn test_adamw_zero_weight_decay() {
        let mut params = vec![Tensor::from_vec(vec![1.0], true)];
        let mut optimizer = AdamW::with_weight_decay(0.1, 0.0);

        params[0].set_grad(ndarray::arr1(&[0.0]));
        optimizer.step(&mut params);

        assert_abs_diff_eq!(params[0].data()[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_adamw_no_grad() {
        let mut params = vec![Tensor::from_vec(vec![1.0, 2.0], false)];
        let mut optimizer = AdamW::default_params(0.1);

        let initial = params[0].data().clone();
        optimizer.step(&mut params);

        assert_eq!(params[0].data(), &initial);
        assert_eq!(optimizer.step_count(), 1);
    }

    #[test]
    fn test_adamw_first_step_is_lr_sized() {
        // With bias correction the first update is lr * sign(g)
        let mut params = vec![Tensor::from_vec(vec![0.0, 0.0], true)];
        let mut optimizer = AdamW::with_weight_decay(0.1, 0.0);

        params[0].set_grad(ndarray::arr1(&[3.0, -0.5]));
        optimizer.step(&mut params);

        assert_abs_diff_eq!(params[0].data()[0], -0.1, epsilon = 1e-4);
        assert_abs_diff_eq!(params[0].data()[1], 0.1, epsilon = 1e-4);
    }

    #[test]
    fn test_adamw_step_refs_matches_step() {
        let mut owned = vec![Tensor::from_vec(vec![1.0, -2.0], true)];
        let mut borrowed = Tensor::from_vec(vec![1.0, -2.0], true);
        let mut opt_a = AdamW::default_params(0.05);
        let mut opt_b = AdamW::default_params(0.05);

        for _ in 0..3 {
            owned[0].set_grad(owned[0].data().mapv(|x| 2.0 * x));
            borrowed.set_grad(borrowed.data().mapv(|x| 2.0 * x));
            opt_a.step(&mut owned);
            opt_b.step_refs(&mut [&mut borrowed]);
        }

        for (a, b) in owned[0].data().iter().zip(borrowed.data().iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_adamw_lr_getter_setter() {
        let mut optimizer = AdamW::default_params(0.1);
        assert_abs_diff_eq!(optimizer.lr(), 0.1, epsilon = 1e-6);
        optimizer.set_lr(0.01);
        assert_abs_diff_eq!(optimizer.lr(), 0.01, epsilon = 1e-6);
        assert_abs_diff_eq!(optimizer.weight_decay(), 0.01, epsilon = 1e-6);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;
        use proptest::prelude::prop;

        proptest! {
            #[test]
            fn prop_update_is_finite(
                values in prop::collection::vec(-1e3f32..1e3, 1..16),
                grads in prop::collection::vec(-1e3f32..1e3, 16),
            ) {
                let n = values.len();
                let mut params = vec![Tensor::from_vec(values, true)];
                let mut optimizer = AdamW::default_params(0.001);
                params[0].set_grad(ndarray::Array1::from(grads[..n].to_vec()));
                optimizer.step(&mut params);
                prop_assert!(params[0].data().iter().all(|v| v.is_finite()));
            }
        }
    }
}

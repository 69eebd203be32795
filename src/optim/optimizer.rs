//! Optimizer trait

use crate::Tensor;

/// Trait for optimization algorithms
pub trait Optimizer {
    /// Perform a single optimization step
    fn step(&mut self, params: &mut [Tensor]);

    /// Perform optimization step on referenced parameters
    ///
    /// This is useful when parameters are borrowed from a model. Parameter
    /// order must be the same on every call.
    fn step_refs(&mut self, params: &mut [&mut Tensor]);

    /// Zero out all gradients
    fn zero_grad(&mut self, params: &mut [Tensor]) {
        for param in params {
            param.zero_grad();
        }
    }

    /// Zero gradients on referenced parameters
    fn zero_grad_refs(&mut self, params: &mut [&mut Tensor]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    /// Plain gradient descent for exercising the default trait methods
    struct TestOptimizer {
        learning_rate: f32,
    }

    impl Optimizer for TestOptimizer {
        fn step(&mut self, params: &mut [Tensor]) {
            let mut refs: Vec<&mut Tensor> = params.iter_mut().collect();
            self.step_refs(&mut refs);
        }

        fn step_refs(&mut self, params: &mut [&mut Tensor]) {
            for param in params.iter_mut() {
                if let Some(grad) = param.grad() {
                    let update = &grad * self.learning_rate;
                    *param.data_mut() -= &update;
                }
            }
        }

        fn lr(&self) -> f32 {
            self.learning_rate
        }

        fn set_lr(&mut self, lr: f32) {
            self.learning_rate = lr;
        }
    }

    #[test]
    fn test_optimizer_zero_grad() {
        let mut opt = TestOptimizer { learning_rate: 0.1 };
        let param = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
        param.set_grad(arr1(&[0.5, 1.0, 1.5]));

        opt.zero_grad(&mut [param.clone()]);
        // the clone shares the gradient cell
        assert!(param.grad().is_none());
    }

    #[test]
    fn test_optimizer_zero_grad_refs() {
        let mut opt = TestOptimizer { learning_rate: 0.1 };
        let mut param1 = Tensor::from_vec(vec![1.0, 2.0], true);
        let mut param2 = Tensor::from_vec(vec![3.0, 4.0], true);
        param1.set_grad(arr1(&[0.5, 1.0]));
        param2.set_grad(arr1(&[1.5, 2.0]));

        opt.zero_grad_refs(&mut [&mut param1, &mut param2]);
        assert!(param1.grad().is_none());
        assert!(param2.grad().is_none());
    }

    #[test]
    fn test_optimizer_set_lr() {
        let mut opt = TestOptimizer { learning_rate: 0.1 };
        assert_eq!(opt.lr(), 0.1);

        opt.set_lr(0.01);
        assert_eq!(opt.lr(), 0.01);
    }
}

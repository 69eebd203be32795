//! Training objectives
//!
//! Loss functions, the reconstruction-loss composition bound to generators
//! and regularisers used when training encoders.
//!
//! # Example
//!
//! ```
//! use agrupar::train::{LossFn, MSELoss, Reduction};
//! use agrupar::autograd::backward;
//! use agrupar::Tensor;
//!
//! let pred = Tensor::from_vec(vec![1.0, 2.0], true);
//! let target = Tensor::from_vec(vec![0.0, 0.0], false);
//! let mut loss = MSELoss::new(Reduction::Sum).forward(&pred, &target);
//! backward(&mut loss, None);
//! assert_eq!(pred.grad().unwrap().to_vec(), vec![2.0, 4.0]);
//! ```

mod loss;

pub use loss::{
    contrastive_gradient_penalty, intensity_to_class, BCELoss, Critic, CrossEntropyLoss,
    GeneralizedCELoss, L1Loss, LossFn, MSELoss, MixedLoss, PixelCrossEntropy, ReconLoss, Reduction,
    ScaledHuberLoss, SmoothL1Loss, VggFeatureLayer, VggLoss, PIXEL_LEVELS,
};
pub(crate) use loss::argmax;

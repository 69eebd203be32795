//! Loss functions for representation learning
//!
//! Reconstruction losses:
//!
//! - [`MSELoss`], [`L1Loss`], [`SmoothL1Loss`], [`ScaledHuberLoss`] - regression
//! - [`BCELoss`] - binary cross-entropy on probabilities
//! - [`CrossEntropyLoss`] - class-index cross-entropy with optional spatial dims
//! - [`PixelCrossEntropy`] - 256-way classification of pixel intensities
//! - [`MixedLoss`] - cross-entropy on one-hot groups plus MSE on continuous columns
//! - [`VggLoss`] - perceptual distance in a frozen feature extractor
//! - [`ReconLoss`] - a base loss optionally composed with a weighted [`VggLoss`]
//!
//! Regularisers and robust objectives:
//!
//! - [`GeneralizedCELoss`] - noise-robust classification loss
//! - [`contrastive_gradient_penalty`] - squared input-gradient norm of a critic
//!
//! Gradient reversal lives in [`crate::autograd::grad_reverse`].

mod bce;
mod composed;
mod cross_entropy;
mod generalized_ce;
mod kernel;
mod mixed;
mod mse;
mod penalty;
mod perceptual;
mod pixel_ce;
mod reduction;
mod traits;

pub use bce::BCELoss;
pub use composed::ReconLoss;
pub use cross_entropy::CrossEntropyLoss;
pub(crate) use cross_entropy::argmax;
pub use generalized_ce::GeneralizedCELoss;
pub use mixed::MixedLoss;
pub use mse::{L1Loss, MSELoss, ScaledHuberLoss, SmoothL1Loss};
pub use penalty::{contrastive_gradient_penalty, Critic};
pub use perceptual::{VggFeatureLayer, VggLoss};
pub use pixel_ce::{intensity_to_class, PixelCrossEntropy, PIXEL_LEVELS};
pub use reduction::Reduction;
pub use traits::LossFn;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_names() {
        assert_eq!(MSELoss::default().name(), "MSE");
        assert_eq!(L1Loss::default().name(), "L1");
        assert_eq!(SmoothL1Loss::default().name(), "SmoothL1");
        assert_eq!(ScaledHuberLoss::default().name(), "Huber");
        assert_eq!(BCELoss::default().name(), "BCE");
        assert_eq!(CrossEntropyLoss::default().name(), "CrossEntropy");
        assert_eq!(PixelCrossEntropy::default().name(), "PixelCrossEntropy");
        assert_eq!(GeneralizedCELoss::default().name(), "GeneralizedCE");
    }

    #[test]
    fn test_reduction_serde() {
        let r: Reduction = serde_yaml::from_str("sum").expect("parse");
        assert_eq!(r, Reduction::Sum);
        assert_eq!(Reduction::default(), Reduction::Mean);
        assert_eq!(Reduction::None.to_string(), "none");
    }
}

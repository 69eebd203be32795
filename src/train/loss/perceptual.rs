//! VGG perceptual loss

use super::{LossFn, MSELoss, Reduction};
use crate::autograd::scale;
use crate::error::{Error, Result};
use crate::nn::{Module, Sequential};
use crate::Tensor;

/// Feature layer of VGG19 at which activations are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VggFeatureLayer {
    /// relu2_2: the first 8 modules
    #[default]
    Layer22,
    /// relu5_4: the first 35 modules
    Layer54,
}

impl VggFeatureLayer {
    /// Number of leading backbone modules kept
    pub fn cut(self) -> usize {
        match self {
            Self::Layer22 => 8,
            Self::Layer54 => 35,
        }
    }

    pub fn number(self) -> u32 {
        match self {
            Self::Layer22 => 22,
            Self::Layer54 => 54,
        }
    }
}

impl TryFrom<u32> for VggFeatureLayer {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            22 => Ok(Self::Layer22),
            54 => Ok(Self::Layer54),
            other => Err(Error::InvalidFeatureLayer(other)),
        }
    }
}

/// Euclidean distance between VGG feature maps of a reconstruction and its target
///
/// The backbone is truncated at the feature layer and frozen. Gradients flow
/// through the features of the reconstruction only; the target's features
/// are computed from a detached copy.
pub struct VggLoss {
    features: Sequential,
    layer: VggFeatureLayer,
    prefactor: f32,
}

impl VggLoss {
    /// Scale that brings the loss to roughly the magnitude of a pixel MSE
    pub const DEFAULT_PREFACTOR: f32 = 0.006;

    /// Cut `backbone` at `feature_layer` (22 when `None`) and freeze it
    pub fn new(backbone: Sequential, feature_layer: Option<u32>, prefactor: f32) -> Result<Self> {
        let layer =
            feature_layer.map_or(Ok(VggFeatureLayer::default()), VggFeatureLayer::try_from)?;

        let required = layer.cut();
        if backbone.len() < required {
            return Err(Error::BackboneTooShallow { required, available: backbone.len() });
        }

        let mut features = backbone;
        features.truncate(required);
        features.freeze();

        Ok(Self { features, layer, prefactor })
    }

    /// Default layer (22) and prefactor
    pub fn with_defaults(backbone: Sequential) -> Result<Self> {
        Self::new(backbone, None, Self::DEFAULT_PREFACTOR)
    }

    pub fn layer(&self) -> VggFeatureLayer {
        self.layer
    }

    pub fn prefactor(&self) -> f32 {
        self.prefactor
    }

    fn extract(&self, x: &Tensor) -> Tensor {
        self.features.forward(x)
    }
}

impl LossFn for VggLoss {
    fn forward(&self, noisy: &Tensor, clean: &Tensor) -> Tensor {
        let feat_noisy = self.extract(noisy);
        let feat_clean = self.extract(&clean.detach()).detach();
        let mse = MSELoss::new(Reduction::Mean).forward(&feat_noisy, &feat_clean);
        scale(&mse, self.prefactor)
    }

    fn name(&self) -> &'static str {
        "VGG"
    }
}

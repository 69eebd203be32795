//! Error types for agrupar
//!
//! Configuration problems are reported when a generator is built; numerical
//! problems are reported from the loss that detected them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for agrupar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by loss construction, generator building and config loading
#[derive(Debug, Error)]
pub enum Error {
    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reconstruction loss name not in {l1, l2, bce, huber, ce, mixed}
    #[error(
        "{0} is an invalid reconstruction loss (expected one of: l1, l2, bce, huber, ce, mixed)"
    )]
    InvalidReconLoss(String),

    /// Encoder type name not in {ae, vae}
    #[error("{0} is an invalid encoder type (expected one of: ae, vae)")]
    InvalidEncoderType(String),

    /// Latent standard-deviation transform name not recognised
    #[error("{0} is an invalid std transform (expected one of: softplus, exp, sigmoid)")]
    InvalidStdTform(String),

    /// VGG feature layer other than 22 or 54
    #[error("'vgg_feature_layer' has to be either 22 or 54, got {0}")]
    InvalidFeatureLayer(u32),

    /// Perceptual backbone has fewer modules than the selected cut
    #[error("Perceptual backbone has {available} modules, need at least {required}")]
    BackboneTooShallow { required: usize, available: usize },

    /// Mixed reconstruction loss requested without a feature-group slice map
    #[error("can only do mixed reconstruction loss with feature groups")]
    MissingFeatureGroups,

    /// Feature-group slice map violates the discrete layout
    #[error("Invalid feature groups: {0}")]
    InvalidFeatureGroups(String),

    /// The architecture provider has no pretrained feature extractor
    #[error("No perceptual backbone available for a nonzero vgg_weight")]
    MissingBackbone,

    /// A NaN showed up where a probability was expected
    #[error("Numerical instability detected in {0}")]
    NumericalInstability(&'static str),

    /// Training step produced a NaN or infinite loss
    #[error("Non-finite loss: {0}")]
    NonFiniteLoss(f32),

    /// IO error with the offending path
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an IO error carrying the path that failed
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

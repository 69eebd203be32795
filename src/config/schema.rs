//! YAML schema for generator configuration
//!
//! ```yaml
//! clust:
//!   encoder: vae
//!   vgg_weight: 0.0
//!   kl_weight: 0.1
//!   vae_std_tform: softplus
//!   enc_lr: 0.001
//!   enc_wd: 0.0
//! enc:
//!   recon_loss: mixed
//!   init_chans: 32
//!   levels: 4
//!   out_dim: 64
//! misc:
//!   device: cpu
//!   seed: 42
//! ```
//!
//! Every field has a default, so partial files are accepted.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generator family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EncoderType {
    /// Deterministic autoencoder
    #[default]
    Ae,
    /// Variational autoencoder
    Vae,
}

impl EncoderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ae => "ae",
            Self::Vae => "vae",
        }
    }

    pub fn is_variational(self) -> bool {
        self == Self::Vae
    }
}

impl FromStr for EncoderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ae" => Ok(Self::Ae),
            "vae" => Ok(Self::Vae),
            other => Err(Error::InvalidEncoderType(other.to_string())),
        }
    }
}

/// Reconstruction loss kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ReconstructionLoss {
    L1,
    #[default]
    L2,
    Bce,
    Huber,
    /// 256-way pixel cross-entropy
    Ce,
    /// Cross-entropy on discrete groups plus MSE on continuous columns
    Mixed,
}

impl ReconstructionLoss {
    pub const ALL: [Self; 6] = [Self::L1, Self::L2, Self::Bce, Self::Huber, Self::Ce, Self::Mixed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::L1 => "l1",
            Self::L2 => "l2",
            Self::Bce => "bce",
            Self::Huber => "huber",
            Self::Ce => "ce",
            Self::Mixed => "mixed",
        }
    }
}

impl FromStr for ReconstructionLoss {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidReconLoss(s.to_string()))
    }
}

/// Transform mapping the raw VAE scale output to a positive standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum VaeStdTform {
    Softplus,
    #[default]
    Exp,
    Sigmoid,
}

impl VaeStdTform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Softplus => "softplus",
            Self::Exp => "exp",
            Self::Sigmoid => "sigmoid",
        }
    }
}

impl FromStr for VaeStdTform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "softplus" => Ok(Self::Softplus),
            "exp" => Ok(Self::Exp),
            "sigmoid" => Ok(Self::Sigmoid),
            other => Err(Error::InvalidStdTform(other.to_string())),
        }
    }
}

macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl TryFrom<String> for $ty {
            type Error = Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

string_conversions!(EncoderType, ReconstructionLoss, VaeStdTform);

/// Complete generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clustering-stage settings
    pub clust: ClusterArgs,

    /// Encoder architecture and reconstruction loss
    pub enc: EncoderArgs,

    /// Runtime settings
    pub misc: MiscArgs,
}

/// Clustering-stage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterArgs {
    pub encoder: EncoderType,

    /// Weight of the perceptual term; 0 disables it
    pub vgg_weight: f32,

    /// Weight of the prior term (KL for VAEs, latent L2 for AEs)
    pub kl_weight: f32,

    pub vae_std_tform: VaeStdTform,

    /// Encoder/decoder learning rate
    pub enc_lr: f32,

    /// Encoder/decoder weight decay
    pub enc_wd: f32,
}

impl Default for ClusterArgs {
    fn default() -> Self {
        Self {
            encoder: EncoderType::default(),
            vgg_weight: 0.0,
            kl_weight: 0.0,
            vae_std_tform: VaeStdTform::default(),
            enc_lr: 1e-3,
            enc_wd: 0.0,
        }
    }
}

/// Encoder architecture and reconstruction loss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderArgs {
    pub recon_loss: ReconstructionLoss,

    /// Width of the first hidden level
    pub init_chans: usize,

    /// Number of down-sampling levels
    pub levels: usize,

    /// Latent dimension
    pub out_dim: usize,
}

impl Default for EncoderArgs {
    fn default() -> Self {
        Self { recon_loss: ReconstructionLoss::default(), init_chans: 32, levels: 4, out_dim: 64 }
    }
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiscArgs {
    /// Device identifier
    pub device: String,

    /// Seed for weight initialisation and latent sampling
    pub seed: u64,
}

impl Default for MiscArgs {
    fn default() -> Self {
        Self { device: "cpu".to_string(), seed: 42 }
    }
}

//! Agrupar: losses and autoencoder generators for representation learning
//!
//! - [`autograd`]: tape-based automatic differentiation over flat `f32` tensors
//! - [`nn`]: layers and the [`nn::Sequential`] container
//! - [`train`]: reconstruction, perceptual, mixed and robust losses plus the
//!   contrastive gradient penalty
//! - [`models`]: AE/VAE generators and the [`models::build_ae`] factory
//! - [`optim`]: AdamW
//! - [`config`]: YAML configuration, validation and CLI arguments
//! - [`data`]: feature-group slice maps for tabular inputs
//!
//! # Example
//!
//! ```
//! use agrupar::config::parse_config;
//! use agrupar::models::{build_ae, DenseArchitecture};
//! use agrupar::Tensor;
//!
//! let yaml = "clust:\n  encoder: vae\n  kl_weight: 0.1\nenc:\n  out_dim: 4\n  levels: 2\n";
//! let cfg = parse_config(yaml)?;
//! let arch = DenseArchitecture::new(cfg.misc.seed);
//! let (mut generator, enc_dim) = build_ae(&cfg, &[8], None, &arch)?;
//!
//! let x = Tensor::from_shape_vec(&[4, 8], vec![0.25; 32], false);
//! let loss = generator.step(&x)?;
//! assert!(loss.is_finite());
//! assert_eq!(generator.encode(&x).shape(), &[4, enc_dim]);
//! # Ok::<(), agrupar::Error>(())
//! ```

pub mod autograd;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod nn;
pub mod optim;
pub mod train;

pub use autograd::Tensor;
pub use error::{Error, Result};

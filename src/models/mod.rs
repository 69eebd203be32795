//! Autoencoder generators and the builder that assembles them
//!
//! ```
//! use agrupar::config::Config;
//! use agrupar::models::{build_ae, DenseArchitecture};
//! use agrupar::Tensor;
//!
//! let mut cfg = Config::default();
//! cfg.enc.out_dim = 2;
//! cfg.enc.levels = 1;
//!
//! let arch = DenseArchitecture::new(cfg.misc.seed);
//! let (mut generator, enc_dim) = build_ae(&cfg, &[4], None, &arch).unwrap();
//! assert_eq!(enc_dim, 2);
//!
//! let x = Tensor::from_shape_vec(&[3, 4], vec![0.5; 12], false);
//! assert!(generator.step(&x).unwrap().is_finite());
//! ```

mod arch;
mod autoencoder;
mod build;
mod generator;
mod vae;


pub use arch::{ArchitectureProvider, AutoEncoderParts, DenseArchitecture};
pub use autoencoder::AutoEncoder;
pub use build::build_ae;
pub use generator::{Generator, GeneratorCore, RoutineOutput};
pub use vae::Vae;

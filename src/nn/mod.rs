//! Neural network building blocks
//!
//! Layers are thin wrappers around autograd ops that own their parameters.
//! [`Sequential`] chains them and supports truncation, which the perceptual
//! loss uses to cut a pretrained backbone at a feature layer.

mod layers;
mod linear;
mod module;
mod sequential;

pub use layers::{Flatten, GradReverse, Identity, Relu, Sigmoid, Unflatten};
pub use linear::Linear;
pub use module::Module;
pub use sequential::Sequential;

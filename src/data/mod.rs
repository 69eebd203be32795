//! Dataset metadata consumed by the losses and generators

mod slices;

pub use slices::{FeatureGroupSlices, CONTINUOUS, DISCRETE};

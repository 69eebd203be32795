//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid learning rate: {0} (must be > 0.0 and finite)")]
    InvalidLearningRate(f32),

    #[error("Invalid weight decay: {0} (must be >= 0.0)")]
    InvalidWeightDecay(f32),

    #[error("Invalid {name}: {value} (must be >= 0.0 and finite)")]
    InvalidLossWeight { name: &'static str, value: f32 },

    #[error("Invalid init_chans: {0} (must be > 0)")]
    InvalidInitChans(usize),

    #[error("Invalid levels: {0} (must be <= {max})", max = super::validator::MAX_LEVELS)]
    InvalidLevels(usize),

    #[error("Invalid out_dim: {0} (must be > 0)")]
    InvalidOutDim(usize),

    #[error("Unsupported device: {0} (only cpu is available)")]
    UnsupportedDevice(String),
}

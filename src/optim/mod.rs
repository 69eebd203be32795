//! Optimizers bound to generators

mod adamw;
mod optimizer;

pub use adamw::AdamW;
pub use optimizer::Optimizer;

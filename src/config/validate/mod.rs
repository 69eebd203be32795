//! Configuration validation
//!
//! Rejects configurations a generator cannot be built or trained from.

mod error;
mod validator;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

pub use error::ValidationError;
pub use validator::validate_config;

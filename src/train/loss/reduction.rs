//! Reduction applied to per-element losses

use serde::{Deserialize, Serialize};

/// How per-element losses are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Keep one value per element (or per sample)
    None,
    /// Average over elements
    #[default]
    Mean,
    /// Sum over elements
    Sum,
}

impl std::fmt::Display for Reduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Mean => "mean",
            Self::Sum => "sum",
        };
        f.write_str(name)
    }
}

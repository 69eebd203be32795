//! Feature-group slice maps for tabular data
//!
//! Tabular inputs are laid out as one-hot encoded discrete features followed
//! by continuous features. The slice map records which column ranges belong
//! to which group, e.g. in YAML:
//!
//! ```yaml
//! discrete:
//!   - { start: 0, end: 3 }
//!   - { start: 3, end: 5 }
//! continuous:
//!   - { start: 5, end: 8 }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// Group holding the one-hot encoded features
pub const DISCRETE: &str = "discrete";
/// Group holding the real-valued features
pub const CONTINUOUS: &str = "continuous";

/// Mapping from group name to ordered, half-open column ranges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureGroupSlices {
    groups: BTreeMap<String, Vec<Range<usize>>>,
}

impl FeatureGroupSlices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a group (builder style)
    pub fn with_group(mut self, name: impl Into<String>, ranges: Vec<Range<usize>>) -> Self {
        self.insert(name, ranges);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, ranges: Vec<Range<usize>>) {
        self.groups.insert(name.into(), ranges);
    }

    pub fn get(&self, name: &str) -> Option<&[Range<usize>]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn discrete(&self) -> Option<&[Range<usize>]> {
        self.get(DISCRETE)
    }

    pub fn continuous(&self) -> Option<&[Range<usize>]> {
        self.get(CONTINUOUS)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Range<usize>])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Check the discrete layout and return the first continuous column
    ///
    /// Discrete groups must exist, start at column 0, each span at least two
    /// columns and follow one another without gaps or overlap. A continuous
    /// group, when present, starts where the last discrete group ends.
    pub fn validate_discrete(&self) -> Result<usize> {
        let groups = self
            .discrete()
            .filter(|g| !g.is_empty())
            .ok_or_else(|| Error::InvalidFeatureGroups("no discrete groups".into()))?;

        if groups[0].start != 0 {
            return Err(Error::InvalidFeatureGroups(format!(
                "discrete features must start at column 0, first group starts at {}",
                groups[0].start
            )));
        }

        if let Some(narrow) = groups.iter().find(|g| g.end < g.start + 2) {
            return Err(Error::InvalidFeatureGroups(format!(
                "discrete group {}..{} spans fewer than 2 columns",
                narrow.start, narrow.end
            )));
        }

        if let Some(pair) = groups.windows(2).find(|pair| pair[1].start != pair[0].end) {
            return Err(Error::InvalidFeatureGroups(format!(
                "discrete groups {}..{} and {}..{} are not contiguous",
                pair[0].start, pair[0].end, pair[1].start, pair[1].end
            )));
        }

        let cont_start = groups[groups.len() - 1].end;
        if let Some(first) = self.continuous().and_then(<[_]>::first) {
            if first.start != cont_start {
                return Err(Error::InvalidFeatureGroups(format!(
                    "continuous features must start at column {cont_start}, found {}..{}",
                    first.start, first.end
                )));
            }
        }

        Ok(cont_start)
    }
}

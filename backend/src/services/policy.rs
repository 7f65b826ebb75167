//! Explicit policies for sparse data.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How absent numeric observations enter an aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Absent values are excluded from count, sum, mean, min and max.
    #[default]
    Skip,
    /// Absent values count as `0.0`. Pulls averages down; opt-in only.
    TreatAsZero,
}

impl MissingValuePolicy {
    /// Resolve one observation. Non-finite values are always absent.
    pub fn resolve(&self, value: Option<f64>) -> Option<f64> {
        match value.filter(|v| v.is_finite()) {
            Some(v) => Some(v),
            None => match self {
                MissingValuePolicy::Skip => None,
                MissingValuePolicy::TreatAsZero => Some(0.0),
            },
        }
    }
}

impl FromStr for MissingValuePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "treat_as_zero" | "zero" => Ok(Self::TreatAsZero),
            other => Err(format!("Unknown missing value policy: {}", other)),
        }
    }
}

/// What to plot for a domain key that has no observations at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Emit the key with a `null` value and let the chart decide.
    #[default]
    NoData,
    /// Emit the key with value `0.0`.
    Zero,
}

impl FromStr for FillPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "no_data" | "null" => Ok(Self::NoData),
            "zero" => Ok(Self::Zero),
            other => Err(format!("Unknown fill policy: {}", other)),
        }
    }
}

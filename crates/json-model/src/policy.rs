//! Bad-cast policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What [`ValueAdapter::cast`](crate::ValueAdapter::cast) does with an
/// input that is neither null, an instance, nor convertible to a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BadCastPolicy {
    /// Fail with [`AdapterError::BadCast`](crate::AdapterError::BadCast).
    #[default]
    #[serde(rename = "raise")]
    Raise,
    /// Resolve to null.
    #[serde(rename = "nil", alias = "null")]
    ReturnNull,
}

impl BadCastPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raise => "raise",
            Self::ReturnNull => "nil",
        }
    }
}

impl fmt::Display for BadCastPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bad-cast policy `{0}` (expected `raise` or `nil`)")]
pub struct ParsePolicyError(pub String);

impl FromStr for BadCastPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raise" => Ok(Self::Raise),
            "nil" | "null" => Ok(Self::ReturnNull),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

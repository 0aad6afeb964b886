//! Collision-resolution strategies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How matched assignees are combined with the ones already on an issue.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Add new matches; keep everyone already assigned.
    #[default]
    Append,
    /// Assign every match, even those already assigned; never remove.
    Set,
    /// Add new matches and remove assignees that no longer match.
    Change,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Append => "append",
            Strategy::Set => "set",
            Strategy::Change => "change",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy {0:?}, expected one of append, set, change")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(Strategy::Append),
            "set" => Ok(Strategy::Set),
            "change" => Ok(Strategy::Change),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

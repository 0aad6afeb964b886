//! Assignment rules and the matcher that evaluates them against issues.
//!
//! A [`RuleSet`] maps each assignee login to an ordered list of typed
//! [`Pattern`]s. [`match_assignees`] is a pure function from a rule set and an
//! issue snapshot to the set of logins whose rules match.

pub mod matcher;
pub mod pattern;
pub mod rule_set;

pub use matcher::{match_assignees, sorted_case_insensitive};
pub use pattern::{Pattern, PatternKind};
pub use rule_set::RuleSet;

use thiserror::Error;

/// Errors building a rule set from configuration.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid rule kind {0:?}, expected one of title, text, label, any")]
    InvalidRuleKind(String),

    #[error("rule {0:?} is not in kind:pattern format")]
    MalformedRule(String),

    #[error("invalid regular expression {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("assignee {0:?} is configured more than once")]
    DuplicateAssignee(String),
}

//! Typed patterns: a kind selecting the issue fields, plus a regular expression.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::RuleError;

/// Which issue field(s) a pattern's expression is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// The issue title.
    Title,
    /// The issue body.
    Text,
    /// Each of the issue's label names.
    Label,
    /// Title or body, then labels.
    Any,
}

impl PatternKind {
    /// All recognized kinds, in the order they are documented.
    pub const ALL: [PatternKind; 4] = [
        PatternKind::Title,
        PatternKind::Text,
        PatternKind::Label,
        PatternKind::Any,
    ];

    /// Returns the configuration keyword for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Title => "title",
            PatternKind::Text => "text",
            PatternKind::Label => "label",
            PatternKind::Any => "any",
        }
    }

    /// Whether a successful match ends evaluation of the remaining patterns
    /// of the same assignee.
    ///
    /// `text` matches keep evaluating. The result set is the same either way;
    /// only the number of regex evaluations differs.
    pub fn short_circuits(&self) -> bool {
        !matches!(self, PatternKind::Text)
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RuleError::InvalidRuleKind(s.to_string()))
    }
}

/// A compiled, case-insensitive pattern of a given kind.
#[derive(Debug, Clone)]
pub struct Pattern {
    kind: PatternKind,
    regex: Regex,
}

impl Pattern {
    /// Compiles `expression` case-insensitively.
    pub fn new(kind: PatternKind, expression: &str) -> Result<Self, RuleError> {
        let regex = RegexBuilder::new(expression)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError::InvalidPattern {
                pattern: expression.to_string(),
                source,
            })?;
        Ok(Pattern { kind, regex })
    }

    /// Parses a `kind:expression` rule line.
    ///
    /// The line is split at the first `:`, so the expression itself may
    /// contain colons.
    pub fn parse(line: &str) -> Result<Self, RuleError> {
        let (kind, expression) = line
            .split_once(':')
            .ok_or_else(|| RuleError::MalformedRule(line.to_string()))?;
        Pattern::new(kind.parse()?, expression)
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Returns the source expression.
    pub fn expression(&self) -> &str {
        self.regex.as_str()
    }

    /// Searches `haystack` for the expression anywhere (not anchored).
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.expression() == other.expression()
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.expression())
    }
}

//! The per-assignee rule set.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use super::RuleError;
use super::pattern::Pattern;

/// An immutable mapping from assignee login to that assignee's patterns.
///
/// Built once from configuration and only read afterwards. Pattern order
/// within an assignee is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: BTreeMap<String, Vec<Pattern>>,
}

impl RuleSet {
    /// Builds a rule set from `(assignee, rules)` pairs, where `rules` is a
    /// newline-separated list of `kind:pattern` lines.
    ///
    /// Blank lines and surrounding whitespace on each line are ignored. The
    /// first invalid line fails the whole set.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghia::rules::RuleSet;
    ///
    /// let rules = RuleSet::parse([
    ///     ("alice", "title:network\ntext:protocol"),
    ///     ("bob", "label:^urgent$"),
    /// ])
    /// .unwrap();
    /// assert_eq!(rules.len(), 2);
    ///
    /// assert!(RuleSet::parse([("carol", "body:oops")]).is_err());
    /// ```
    pub fn parse<I, K, V>(entries: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut rules = BTreeMap::new();
        for (assignee, text) in entries {
            let patterns = parse_rule_lines(text.as_ref().lines())?;
            insert_unique(&mut rules, assignee.into(), patterns)?;
        }
        Ok(RuleSet { rules })
    }

    /// Builds a rule set from already-split rule lines per assignee.
    pub fn parse_lines<I, K, L, S>(entries: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = BTreeMap::new();
        for (assignee, lines) in entries {
            let lines: Vec<S> = lines.into_iter().collect();
            let patterns = parse_rule_lines(lines.iter().map(AsRef::as_ref))?;
            insert_unique(&mut rules, assignee.into(), patterns)?;
        }
        Ok(RuleSet { rules })
    }

    /// Iterates over assignees and their patterns, ordered by login.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Pattern])> {
        self.rules
            .iter()
            .map(|(assignee, patterns)| (assignee.as_str(), patterns.as_slice()))
    }

    /// Returns the patterns configured for `assignee`.
    pub fn patterns(&self, assignee: &str) -> Option<&[Pattern]> {
        self.rules.get(assignee).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Renders the rules back to `kind:pattern` strings, for display.
    pub fn to_lines(&self) -> BTreeMap<String, Vec<String>> {
        self.rules
            .iter()
            .map(|(assignee, patterns)| {
                let lines = patterns.iter().map(ToString::to_string).collect();
                (assignee.clone(), lines)
            })
            .collect()
    }
}

fn insert_unique(
    rules: &mut BTreeMap<String, Vec<Pattern>>,
    assignee: String,
    patterns: Vec<Pattern>,
) -> Result<(), RuleError> {
    match rules.entry(assignee) {
        Entry::Vacant(slot) => {
            slot.insert(patterns);
            Ok(())
        }
        Entry::Occupied(slot) => Err(RuleError::DuplicateAssignee(slot.key().clone())),
    }
}

fn parse_rule_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Result<Vec<Pattern>, RuleError> {
    lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Pattern::parse)
        .collect()
}

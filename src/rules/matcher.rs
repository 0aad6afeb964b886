//! Pure matching of issues against a rule set.

use std::collections::BTreeSet;

use super::pattern::{Pattern, PatternKind};
use super::rule_set::RuleSet;
use crate::types::IssueSnapshot;

/// Returns the logins whose rules match `issue`.
///
/// Patterns of one assignee are evaluated in order. A `title`, `label` or
/// `any` match stops evaluation for that assignee; a `text` match does not.
pub fn match_assignees(rules: &RuleSet, issue: &IssueSnapshot) -> BTreeSet<String> {
    let mut matched = BTreeSet::new();
    for (assignee, patterns) in rules.iter() {
        for pattern in patterns {
            if pattern_matches(pattern, issue) {
                matched.insert(assignee.to_string());
                if pattern.kind().short_circuits() {
                    break;
                }
            }
        }
    }
    matched
}

fn pattern_matches(pattern: &Pattern, issue: &IssueSnapshot) -> bool {
    match pattern.kind() {
        PatternKind::Title => pattern.is_match(&issue.title),
        PatternKind::Text => pattern.is_match(&issue.body),
        PatternKind::Label => any_label_matches(pattern, issue),
        PatternKind::Any => {
            pattern.is_match(&issue.title)
                || pattern.is_match(&issue.body)
                || any_label_matches(pattern, issue)
        }
    }
}

fn any_label_matches(pattern: &Pattern, issue: &IssueSnapshot) -> bool {
    issue.labels.iter().any(|label| pattern.is_match(label))
}

/// Sorts logins case-insensitively, falling back to the exact string so the
/// order is total.
pub fn sorted_case_insensitive<'a, I>(logins: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut sorted: Vec<&str> = logins.into_iter().map(String::as_str).collect();
    sorted.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    sorted
}

//! The fallback label applied to issues no rule matches.

use serde::{Deserialize, Serialize};

use crate::effects::GitHubEffect;
use crate::types::IssueNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub label: String,
}

impl FallbackConfig {
    pub fn new(label: impl Into<String>) -> Self {
        FallbackConfig {
            label: label.into(),
        }
    }
}

/// What to do about the fallback label on one unmatched issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackDecision {
    /// The issue already carries the label; nothing to change.
    AlreadyLabeled { label: String },
    /// The label is missing. `labels` is the full label set to write.
    AddLabel { label: String, labels: Vec<String> },
}

/// Decides the fallback action given the issue's current label names.
///
/// The comparison is exact: a differently cased label counts as missing.
pub fn decide_fallback(config: &FallbackConfig, current_labels: &[String]) -> FallbackDecision {
    let label = config.label.clone();
    if current_labels.contains(&label) {
        return FallbackDecision::AlreadyLabeled { label };
    }
    let mut labels = current_labels.to_vec();
    labels.push(label.clone());
    FallbackDecision::AddLabel { label, labels }
}

impl FallbackDecision {
    /// The note shown in the issue's report.
    pub fn note(&self) -> String {
        match self {
            FallbackDecision::AlreadyLabeled { label } => format!("already has label \"{label}\""),
            FallbackDecision::AddLabel { label, .. } => format!("added label \"{label}\""),
        }
    }

    /// The label write this decision requires, if any.
    pub fn effect(&self, issue: IssueNumber) -> Option<GitHubEffect> {
        match self {
            FallbackDecision::AlreadyLabeled { .. } => None,
            FallbackDecision::AddLabel { labels, .. } => Some(GitHubEffect::ReplaceLabels {
                issue,
                labels: labels.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn adds_missing_label_after_existing_ones() {
        let config = FallbackConfig::new("Need assignment");
        let decision = decide_fallback(&config, &labels(&["bug"]));
        assert_eq!(
            decision,
            FallbackDecision::AddLabel {
                label: "Need assignment".into(),
                labels: labels(&["bug", "Need assignment"]),
            }
        );
        assert_eq!(decision.note(), "added label \"Need assignment\"");
        assert_eq!(
            decision.effect(IssueNumber(4)),
            Some(GitHubEffect::ReplaceLabels {
                issue: IssueNumber(4),
                labels: labels(&["bug", "Need assignment"]),
            })
        );
    }

    #[test]
    fn present_label_needs_no_write() {
        let config = FallbackConfig::new("Need assignment");
        let decision = decide_fallback(&config, &labels(&["Need assignment", "bug"]));
        assert_eq!(decision.note(), "already has label \"Need assignment\"");
        assert_eq!(decision.effect(IssueNumber(4)), None);
    }

    #[test]
    fn label_comparison_is_case_sensitive() {
        let config = FallbackConfig::new("Need assignment");
        let decision = decide_fallback(&config, &labels(&["need assignment"]));
        assert!(matches!(decision, FallbackDecision::AddLabel { .. }));
    }

    #[test]
    fn unlabeled_issue_gets_only_the_fallback() {
        let config = FallbackConfig::new("triage");
        let decision = decide_fallback(&config, &[]);
        assert_eq!(
            decision,
            FallbackDecision::AddLabel {
                label: "triage".into(),
                labels: labels(&["triage"]),
            }
        );
    }
}

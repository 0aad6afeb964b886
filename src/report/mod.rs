//! Per-issue and per-run reports.
//!
//! Reports are plain data. [`format`] renders them for the terminal; the
//! webhook server returns them as JSON.

pub mod format;

use serde::Serialize;

use crate::reconcile::{AssigneeStatus, OperationPlan};
use crate::rules::sorted_case_insensitive;
use crate::types::{IssueNumber, IssueSnapshot, RepoId};

/// One `(status, assignee)` line of an issue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub status: AssigneeStatus,
    pub assignee: String,
}

impl StatusLine {
    /// Builds the status lines of `plan`, sorted case-insensitively by login.
    pub fn from_plan(plan: &OperationPlan) -> Vec<StatusLine> {
        sorted_case_insensitive(plan.statuses.keys())
            .into_iter()
            .filter_map(|login| {
                plan.statuses.get(login).map(|&status| StatusLine {
                    status,
                    assignee: login.to_string(),
                })
            })
            .collect()
    }
}

/// The outcome of processing one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueReport {
    pub issue_number: IssueNumber,
    /// `owner/repo#N`.
    pub issue_ref: String,
    pub url: String,
    pub ok: bool,
    /// Why processing failed, when `ok` is false.
    pub error: Option<String>,
    pub status_lines: Vec<StatusLine>,
    pub fallback_note: Option<String>,
}

impl IssueReport {
    /// A successful report with no status lines yet.
    pub fn new(repo: &RepoId, issue: &IssueSnapshot) -> Self {
        IssueReport {
            issue_number: issue.number,
            issue_ref: repo.issue_ref(issue.number),
            url: issue.url.clone(),
            ok: true,
            error: None,
            status_lines: Vec::new(),
            fallback_note: None,
        }
    }

    /// Marks the report failed. Status lines and the fallback note are
    /// dropped since they may not reflect what happened.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.ok = false;
        self.error = Some(error.into());
        self.status_lines.clear();
        self.fallback_note = None;
    }

    /// `owner/repo#N (url)`.
    pub fn header_line(&self) -> String {
        format!("{} ({})", self.issue_ref, self.url)
    }
}

/// All issue reports of one run, in the order the issues were listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub repo: RepoId,
    pub issues: Vec<IssueReport>,
}

impl BatchReport {
    pub fn new(repo: RepoId) -> Self {
        BatchReport {
            repo,
            issues: Vec::new(),
        }
    }

    pub fn failed(&self) -> impl Iterator<Item = &IssueReport> {
        self.issues.iter().filter(|report| !report.ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{Strategy, reconcile};
    use std::collections::BTreeSet;

    fn set(logins: &[&str]) -> BTreeSet<String> {
        logins.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn status_lines_sort_case_insensitively() {
        let plan = reconcile(
            &set(&["bob", "Alice"]),
            &set(&["carol", "Bob"]),
            Strategy::Change,
        );
        let lines: Vec<(char, String)> = StatusLine::from_plan(&plan)
            .into_iter()
            .map(|line| (line.status.symbol(), line.assignee))
            .collect();
        assert_eq!(
            lines,
            vec![
                ('+', "Alice".to_string()),
                ('-', "Bob".to_string()),
                ('+', "bob".to_string()),
                ('-', "carol".to_string()),
            ]
        );
    }

    #[test]
    fn header_includes_url() {
        let repo = RepoId::new("octocat", "hello");
        let issue = IssueSnapshot::new(5, "https://github.com/octocat/hello/issues/5", "t");
        let report = IssueReport::new(&repo, &issue);
        assert_eq!(
            report.header_line(),
            "octocat/hello#5 (https://github.com/octocat/hello/issues/5)"
        );
    }

    #[test]
    fn failing_clears_lines() {
        let repo = RepoId::new("o", "r");
        let mut report = IssueReport::new(&repo, &IssueSnapshot::new(1, "u", "t"));
        report.status_lines.push(StatusLine {
            status: AssigneeStatus::Added,
            assignee: "alice".into(),
        });
        report.fallback_note = Some("added label \"x\"".into());
        report.fail("boom");
        assert!(!report.ok);
        assert_eq!(report.error.as_deref(), Some("boom"));
        assert!(report.status_lines.is_empty());
        assert!(report.fallback_note.is_none());
    }
}

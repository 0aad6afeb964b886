//! Shared test utilities: a recording interpreter and arbitrary generators for
//! property-based testing.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use proptest::prelude::*;
use thiserror::Error;

use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse, UserData};
use crate::types::{IssueNumber, IssueSnapshot};

// ─── Arbitrary Generators ─────────────────────────────────────────────────────

/// Logins drawn from a small pool so generated sets overlap.
pub fn arb_login() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["alice", "bob", "carol", "dave", "Erin"]).prop_map(String::from)
}

pub fn arb_logins() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(arb_login(), 0..4)
}

pub fn arb_issue() -> impl Strategy<Value = IssueSnapshot> {
    (
        1..10_000u64,
        "[a-zA-Z0-9 ]{0,20}",
        prop::option::of("[a-zA-Z0-9 \n]{0,40}"),
        prop::collection::vec("[a-z0-9:-]{1,10}", 0..4),
        arb_logins(),
    )
        .prop_map(|(number, title, body, labels, assignees)| {
            issue(number)
                .with_title(title)
                .with_body(body)
                .with_labels(labels)
                .with_assignees(assignees)
        })
}

// ─── Builders ─────────────────────────────────────────────────────────────────

/// An issue in `owner/repo` with a canonical URL and an empty title.
pub fn issue(number: u64) -> IssueSnapshot {
    IssueSnapshot::new(
        number,
        format!("https://github.com/owner/repo/issues/{number}"),
        "",
    )
}

// ─── Recording Interpreter ────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("mock GitHub failure: {0}")]
pub struct MockError(pub String);

/// A GitHub interpreter that serves canned issues and records every effect it
/// is asked to execute.
#[derive(Debug, Default)]
pub struct RecordingInterpreter {
    issues: Vec<IssueSnapshot>,
    labels: HashMap<IssueNumber, Vec<String>>,
    failing: HashSet<IssueNumber>,
    fail_listing: bool,
    effects: Mutex<Vec<GitHubEffect>>,
}

impl RecordingInterpreter {
    pub fn new(issues: impl IntoIterator<Item = IssueSnapshot>) -> Self {
        RecordingInterpreter {
            issues: issues.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Overrides the labels `GetLabels` returns for an issue. Without an
    /// override the snapshot's labels are returned.
    pub fn with_fresh_labels(mut self, issue: u64, labels: &[&str]) -> Self {
        self.labels.insert(
            IssueNumber(issue),
            labels.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Makes every effect on `issue` fail.
    pub fn failing_on(mut self, issue: u64) -> Self {
        self.failing.insert(IssueNumber(issue));
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Every effect received so far, in order.
    pub fn effects(&self) -> Vec<GitHubEffect> {
        self.effects.lock().unwrap().clone()
    }

    /// The mutating effects received so far, in order.
    pub fn mutations(&self) -> Vec<GitHubEffect> {
        self.effects()
            .into_iter()
            .filter(GitHubEffect::is_mutation)
            .collect()
    }

    fn snapshot(&self, number: IssueNumber) -> Result<&IssueSnapshot, MockError> {
        self.issues
            .iter()
            .find(|issue| issue.number == number)
            .ok_or_else(|| MockError(format!("no such issue {number}")))
    }

    fn check(&self, number: IssueNumber) -> Result<(), MockError> {
        if self.failing.contains(&number) {
            return Err(MockError(format!("HTTP 500 on issue {number}")));
        }
        Ok(())
    }
}

impl GitHubInterpreter for RecordingInterpreter {
    type Error = MockError;

    async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
        self.effects.lock().unwrap().push(effect.clone());

        match effect {
            GitHubEffect::ListOpenIssues => {
                if self.fail_listing {
                    return Err(MockError("HTTP 404 listing issues".into()));
                }
                Ok(GitHubResponse::Issues(self.issues.clone()))
            }
            GitHubEffect::GetLabels { issue } => {
                self.check(issue)?;
                let labels = match self.labels.get(&issue) {
                    Some(labels) => labels.clone(),
                    None => self.snapshot(issue)?.labels.clone(),
                };
                Ok(GitHubResponse::Labels(labels))
            }
            GitHubEffect::GetAuthenticatedUser => Ok(GitHubResponse::User(UserData {
                login: "ghia-bot".into(),
                html_url: "https://github.com/ghia-bot".into(),
            })),
            GitHubEffect::ReplaceLabels { issue, labels } => {
                self.check(issue)?;
                Ok(GitHubResponse::LabelsReplaced(labels))
            }
            GitHubEffect::AddAssignees { issue, assignees } => {
                self.check(issue)?;
                let mut now = self.snapshot(issue)?.assignees.clone();
                now.extend(assignees);
                Ok(GitHubResponse::AssigneesAdded(now.into_iter().collect()))
            }
            GitHubEffect::RemoveAssignees { issue, assignees } => {
                self.check(issue)?;
                let mut now = self.snapshot(issue)?.assignees.clone();
                for login in &assignees {
                    now.remove(login);
                }
                Ok(GitHubResponse::AssigneesRemoved(now.into_iter().collect()))
            }
        }
    }
}

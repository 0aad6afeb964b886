//! Issue snapshots as seen by the assignment engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ids::IssueNumber;

/// The state of one issue, fetched once and never mutated by the engine.
///
/// Changes to the issue happen through API calls against GitHub, not against
/// this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    /// The issue number.
    pub number: IssueNumber,

    /// The canonical (HTML) URL of the issue.
    pub url: String,

    /// The issue title.
    pub title: String,

    /// The issue body. GitHub returns `null` for an empty body; that is
    /// stored as the empty string.
    pub body: String,

    /// Label names, in the order GitHub returned them.
    pub labels: Vec<String>,

    /// Logins of the users currently assigned.
    pub assignees: BTreeSet<String>,
}

impl IssueSnapshot {
    /// Creates a snapshot with an empty body, no labels and no assignees.
    pub fn new(number: u64, url: impl Into<String>, title: impl Into<String>) -> Self {
        IssueSnapshot {
            number: IssueNumber(number),
            url: url.into(),
            title: title.into(),
            body: String::new(),
            labels: Vec::new(),
            assignees: BTreeSet::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the body; `None` becomes the empty string.
    pub fn with_body(mut self, body: Option<impl Into<String>>) -> Self {
        self.body = body.map(Into::into).unwrap_or_default();
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = assignees.into_iter().map(Into::into).collect();
        self
    }
}

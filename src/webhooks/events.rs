//! GitHub webhook event types.
//!
//! Typed representations of the webhook events the server handles, holding
//! only the fields processing needs:
//!
//! - `ping` - sent by GitHub when a hook is created
//! - `issues` - issue lifecycle, assignment and labeling changes

use crate::types::{IssueSnapshot, RepoId};

/// Event names accepted in the `X-GitHub-Event` header.
pub const SUPPORTED_EVENTS: [&str; 2] = ["issues", "ping"];

/// A parsed GitHub webhook event.
///
/// Unsupported event types are represented by returning `None` from the
/// parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    Ping(PingEvent),
    Issues(IssuesEvent),
}

/// A `ping` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingEvent {
    pub hook_id: u64,
    /// The repository's `owner/name`.
    pub repo_full_name: String,
}

/// Action performed on an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueAction {
    Opened,
    Edited,
    Transferred,
    Reopened,
    Assigned,
    Unassigned,
    Labeled,
    Unlabeled,
    /// Any other action (closed, deleted, pinned, milestoned, ...).
    Other(String),
}

impl IssueAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "opened" => IssueAction::Opened,
            "edited" => IssueAction::Edited,
            "transferred" => IssueAction::Transferred,
            "reopened" => IssueAction::Reopened,
            "assigned" => IssueAction::Assigned,
            "unassigned" => IssueAction::Unassigned,
            "labeled" => IssueAction::Labeled,
            "unlabeled" => IssueAction::Unlabeled,
            other => IssueAction::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IssueAction::Opened => "opened",
            IssueAction::Edited => "edited",
            IssueAction::Transferred => "transferred",
            IssueAction::Reopened => "reopened",
            IssueAction::Assigned => "assigned",
            IssueAction::Unassigned => "unassigned",
            IssueAction::Labeled => "labeled",
            IssueAction::Unlabeled => "unlabeled",
            IssueAction::Other(other) => other,
        }
    }

    /// Whether this action can change which rules match, or which users are
    /// assigned, and so warrants re-running assignment.
    pub fn triggers_assignment(&self) -> bool {
        !matches!(self, IssueAction::Other(_))
    }
}

/// An `issues` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuesEvent {
    pub action: IssueAction,
    pub repo: RepoId,
    /// The issue as described by the payload.
    pub issue: IssueSnapshot,
    /// Whether the issue is open.
    pub is_open: bool,
}

impl IssuesEvent {
    /// Whether the server should run assignment for this event.
    pub fn should_process(&self) -> bool {
        self.is_open && self.action.triggers_assignment()
    }
}

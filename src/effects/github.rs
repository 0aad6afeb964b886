//! GitHub API effect types.
//!
//! These types describe GitHub API operations as data, without executing them.

use serde::{Deserialize, Serialize};

use crate::types::{IssueNumber, IssueSnapshot};

/// A GitHub API effect.
///
/// Effects are repo-scoped: the interpreter is constructed with a `RepoId`, so
/// effects don't include it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GitHubEffect {
    // ─── Queries ──────────────────────────────────────────────────────────────
    /// List every open issue in the repository, across all pages.
    ListOpenIssues,

    /// Fetch the current label names of an issue.
    GetLabels { issue: IssueNumber },

    /// Fetch the user the client is authenticated as.
    GetAuthenticatedUser,

    // ─── Mutations ────────────────────────────────────────────────────────────
    /// Replace the issue's whole label set.
    ReplaceLabels {
        issue: IssueNumber,
        labels: Vec<String>,
    },

    /// Assign users to an issue. GitHub silently ignores logins that cannot
    /// be assigned.
    AddAssignees {
        issue: IssueNumber,
        assignees: Vec<String>,
    },

    /// Unassign users from an issue.
    RemoveAssignees {
        issue: IssueNumber,
        assignees: Vec<String>,
    },
}

impl GitHubEffect {
    /// Whether executing this effect changes state on GitHub.
    ///
    /// Dry runs skip exactly these effects.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            GitHubEffect::ReplaceLabels { .. }
                | GitHubEffect::AddAssignees { .. }
                | GitHubEffect::RemoveAssignees { .. }
        )
    }
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub login: String,
    pub html_url: String,
}

/// Response from a GitHub effect.
///
/// Each variant corresponds to the response from a particular effect type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GitHubResponse {
    /// Response to `ListOpenIssues`, in the order GitHub returned them.
    Issues(Vec<IssueSnapshot>),

    /// Response to `GetLabels`.
    Labels(Vec<String>),

    /// Response to `ReplaceLabels`: the label set now on the issue.
    LabelsReplaced(Vec<String>),

    /// Response to `AddAssignees`: the assignees now on the issue.
    AssigneesAdded(Vec<String>),

    /// Response to `RemoveAssignees`: the assignees left on the issue.
    AssigneesRemoved(Vec<String>),

    /// Response to `GetAuthenticatedUser`.
    User(UserData),
}

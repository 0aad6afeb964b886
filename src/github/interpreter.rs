//! GitHub effect interpreter using octocrab.
//!
//! This module implements the `GitHubInterpreter` trait, executing GitHub effects
//! against the real GitHub API via the REST issues endpoints.

use octocrab::Octocrab;
use octocrab::models::issues::Issue;

use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse, UserData};
use crate::types::{IssueNumber, IssueSnapshot};

use super::client::OctocrabClient;
use super::error::GitHubApiError;

const PAGE_SIZE: u8 = 100;

impl GitHubInterpreter for OctocrabClient {
    type Error = GitHubApiError;

    async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
        interpret_github_effect(self, effect).await
    }
}

/// Interprets a GitHub effect, executing it against the GitHub API.
pub async fn interpret_github_effect(
    client: &OctocrabClient,
    effect: GitHubEffect,
) -> Result<GitHubResponse, GitHubApiError> {
    tracing::debug!(repo = %client.repo(), ?effect, "Executing GitHub effect");
    match effect {
        GitHubEffect::ListOpenIssues => list_open_issues(client).await,
        GitHubEffect::GetLabels { issue } => get_labels(client, issue).await,
        GitHubEffect::GetAuthenticatedUser => fetch_authenticated_user(client.inner())
            .await
            .map(GitHubResponse::User),
        GitHubEffect::ReplaceLabels { issue, labels } => {
            replace_labels(client, issue, labels).await
        }
        GitHubEffect::AddAssignees { issue, assignees } => {
            add_assignees(client, issue, assignees).await
        }
        GitHubEffect::RemoveAssignees { issue, assignees } => {
            remove_assignees(client, issue, assignees).await
        }
    }
}

// ─── Queries ──────────────────────────────────────────────────────────────────

async fn list_open_issues(client: &OctocrabClient) -> Result<GitHubResponse, GitHubApiError> {
    let mut page = 1u32;
    let mut all_issues = Vec::new();

    loop {
        let result = client
            .inner()
            .issues(client.owner(), client.repo_name())
            .list()
            .state(octocrab::params::State::Open)
            .per_page(PAGE_SIZE)
            .page(page)
            .send()
            .await;

        match result {
            Ok(page_result) => {
                let items = page_result.items;
                let is_last_page = items.len() < usize::from(PAGE_SIZE);
                all_issues.extend(items.into_iter().map(issue_snapshot));

                if is_last_page {
                    break;
                }
                page += 1;
            }
            Err(e) => return Err(GitHubApiError::from_octocrab(e)),
        }
    }

    tracing::debug!(repo = %client.repo(), count = all_issues.len(), "Listed open issues");
    Ok(GitHubResponse::Issues(all_issues))
}

async fn get_labels(
    client: &OctocrabClient,
    issue: IssueNumber,
) -> Result<GitHubResponse, GitHubApiError> {
    let mut page = 1u32;
    let mut all_labels = Vec::new();

    loop {
        let result = client
            .inner()
            .issues(client.owner(), client.repo_name())
            .list_labels_for_issue(issue.0)
            .per_page(PAGE_SIZE)
            .page(page)
            .send()
            .await;

        match result {
            Ok(page_result) => {
                let items = page_result.items;
                let is_last_page = items.len() < usize::from(PAGE_SIZE);
                all_labels.extend(items.into_iter().map(|label| label.name));

                if is_last_page {
                    break;
                }
                page += 1;
            }
            Err(e) => return Err(GitHubApiError::from_octocrab(e)),
        }
    }

    Ok(GitHubResponse::Labels(all_labels))
}

/// Fetches the user the given octocrab instance is authenticated as.
///
/// Not repository-scoped, so the server can call it at startup before any
/// webhook names a repository.
pub async fn fetch_authenticated_user(client: &Octocrab) -> Result<UserData, GitHubApiError> {
    let user = client
        .current()
        .user()
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(UserData {
        login: user.login,
        html_url: user.html_url.to_string(),
    })
}

// ─── Mutations ────────────────────────────────────────────────────────────────

async fn replace_labels(
    client: &OctocrabClient,
    issue: IssueNumber,
    labels: Vec<String>,
) -> Result<GitHubResponse, GitHubApiError> {
    let result = client
        .inner()
        .issues(client.owner(), client.repo_name())
        .replace_all_labels(issue.0, &labels)
        .await;

    match result {
        Ok(labels) => Ok(GitHubResponse::LabelsReplaced(
            labels.into_iter().map(|label| label.name).collect(),
        )),
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

async fn add_assignees(
    client: &OctocrabClient,
    issue: IssueNumber,
    assignees: Vec<String>,
) -> Result<GitHubResponse, GitHubApiError> {
    let logins: Vec<&str> = assignees.iter().map(String::as_str).collect();
    let result = client
        .inner()
        .issues(client.owner(), client.repo_name())
        .add_assignees(issue.0, &logins)
        .await;

    match result {
        Ok(updated) => Ok(GitHubResponse::AssigneesAdded(assignee_logins(&updated))),
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

async fn remove_assignees(
    client: &OctocrabClient,
    issue: IssueNumber,
    assignees: Vec<String>,
) -> Result<GitHubResponse, GitHubApiError> {
    let logins: Vec<&str> = assignees.iter().map(String::as_str).collect();
    let result = client
        .inner()
        .issues(client.owner(), client.repo_name())
        .remove_assignees(issue.0, &logins)
        .await;

    match result {
        Ok(updated) => Ok(GitHubResponse::AssigneesRemoved(assignee_logins(&updated))),
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

// ─── Conversions ──────────────────────────────────────────────────────────────

fn issue_snapshot(issue: Issue) -> IssueSnapshot {
    IssueSnapshot::new(issue.number, issue.html_url.to_string(), issue.title)
        .with_body(issue.body)
        .with_labels(issue.labels.into_iter().map(|label| label.name))
        .with_assignees(issue.assignees.into_iter().map(|user| user.login))
}

fn assignee_logins(issue: &Issue) -> Vec<String> {
    issue.assignees.iter().map(|user| user.login.clone()).collect()
}

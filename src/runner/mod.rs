//! The batch runner: lists a repository's open issues and processes each one.
//!
//! Issues are processed one at a time in the order GitHub listed them. A
//! failure while processing one issue is recorded in that issue's report and
//! the run moves on; only a failure to list the issues ends the run.

use std::fmt::Display;

use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse};
use crate::reconcile::{
    FallbackConfig, FallbackDecision, OperationPlan, Strategy, decide_fallback, reconcile,
};
use crate::report::{BatchReport, IssueReport, StatusLine};
use crate::rules::{RuleSet, match_assignees};
use crate::types::{IssueSnapshot, RepoId};

/// Everything a run needs besides the repository. Built once, read-only.
#[derive(Debug, Clone, Default)]
pub struct AssignmentConfig {
    pub rules: RuleSet,
    pub strategy: Strategy,
    pub fallback: Option<FallbackConfig>,
    /// Compute and report everything, but issue no mutating API call.
    pub dry_run: bool,
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not list issues for repository {repo}: {message}")]
    ListingFailed { repo: RepoId, message: String },
}

/// Errors while processing a single issue. These never end a run.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("{0}")]
    Api(String),

    #[error("unexpected response to {effect}: {response}")]
    UnexpectedResponse {
        effect: &'static str,
        response: String,
    },
}

/// Matches an issue against the rules and reconciles the result with its
/// current assignees.
pub fn match_and_reconcile(
    issue: &IssueSnapshot,
    rules: &RuleSet,
    strategy: Strategy,
) -> OperationPlan {
    let matched = match_assignees(rules, issue);
    reconcile(&matched, &issue.assignees, strategy)
}

/// Processes every open issue of `repo`.
pub async fn run<I>(
    github: &I,
    repo: &RepoId,
    config: &AssignmentConfig,
) -> Result<BatchReport, RunError>
where
    I: GitHubInterpreter,
    I::Error: Display,
{
    let span = info_span!("run", repo = %repo, strategy = %config.strategy, dry_run = config.dry_run);
    async {
        let issues = list_open_issues(github)
            .await
            .map_err(|e| RunError::ListingFailed {
                repo: repo.clone(),
                message: e.to_string(),
            })?;
        info!(count = issues.len(), "Processing open issues");

        let mut batch = BatchReport::new(repo.clone());
        for issue in &issues {
            batch.issues.push(process_issue(github, repo, issue, config).await);
        }

        let failed = batch.failed().count();
        if failed > 0 {
            warn!(failed, "Some issues could not be updated");
        }
        Ok(batch)
    }
    .instrument(span)
    .await
}

/// Processes one issue and reports the outcome. Never fails: errors are
/// captured in the report.
pub async fn process_issue<I>(
    github: &I,
    repo: &RepoId,
    issue: &IssueSnapshot,
    config: &AssignmentConfig,
) -> IssueReport
where
    I: GitHubInterpreter,
    I::Error: Display,
{
    let mut report = IssueReport::new(repo, issue);
    let span = info_span!("issue", issue = %report.issue_ref);
    match apply(github, issue, config).instrument(span).await {
        Ok((plan, fallback)) => {
            report.status_lines = StatusLine::from_plan(&plan);
            report.fallback_note = fallback.as_ref().map(FallbackDecision::note);
        }
        Err(e) => {
            warn!(issue = %report.issue_ref, error = %e, "Could not update issue");
            report.fail(e.to_string());
        }
    }
    report
}

async fn apply<I>(
    github: &I,
    issue: &IssueSnapshot,
    config: &AssignmentConfig,
) -> Result<(OperationPlan, Option<FallbackDecision>), IssueError>
where
    I: GitHubInterpreter,
    I::Error: Display,
{
    let matched = match_assignees(&config.rules, issue);
    let plan = reconcile(&matched, &issue.assignees, config.strategy);
    debug!(
        matched = ?matched,
        to_add = ?plan.to_add,
        to_remove = ?plan.to_remove,
        "Computed plan"
    );

    for effect in plan.effects(issue.number) {
        let requested = match &effect {
            GitHubEffect::AddAssignees { assignees, .. } => Some(assignees.clone()),
            _ => None,
        };
        let response = execute(github, effect, config.dry_run).await?;
        if let (Some(requested), Some(GitHubResponse::AssigneesAdded(now))) = (requested, response)
        {
            let ignored: Vec<&String> = requested.iter().filter(|l| !now.contains(l)).collect();
            if !ignored.is_empty() {
                // The report still shows them as added.
                warn!(assignees = ?ignored, "GitHub did not assign some users");
            }
        }
    }

    let fallback = match &config.fallback {
        Some(fallback) if matched.is_empty() => {
            Some(apply_fallback(github, issue, fallback, config.dry_run).await?)
        }
        _ => None,
    };

    Ok((plan, fallback))
}

async fn apply_fallback<I>(
    github: &I,
    issue: &IssueSnapshot,
    fallback: &FallbackConfig,
    dry_run: bool,
) -> Result<FallbackDecision, IssueError>
where
    I: GitHubInterpreter,
    I::Error: Display,
{
    let effect = GitHubEffect::GetLabels {
        issue: issue.number,
    };
    let labels = match execute(github, effect, dry_run).await? {
        Some(GitHubResponse::Labels(labels)) => labels,
        other => {
            return Err(IssueError::UnexpectedResponse {
                effect: "get_labels",
                response: format!("{other:?}"),
            });
        }
    };

    let decision = decide_fallback(fallback, &labels);
    if let Some(effect) = decision.effect(issue.number) {
        execute(github, effect, dry_run).await?;
    }
    info!(label = %fallback.label, note = %decision.note(), "Applied fallback");
    Ok(decision)
}

/// Runs `effect` unless it is a mutation during a dry run, in which case
/// `None` is returned.
async fn execute<I>(
    github: &I,
    effect: GitHubEffect,
    dry_run: bool,
) -> Result<Option<GitHubResponse>, IssueError>
where
    I: GitHubInterpreter,
    I::Error: Display,
{
    if dry_run && effect.is_mutation() {
        info!(?effect, "Dry run, skipping");
        return Ok(None);
    }
    github
        .interpret(effect)
        .await
        .map(Some)
        .map_err(|e| IssueError::Api(e.to_string()))
}

async fn list_open_issues<I>(github: &I) -> Result<Vec<IssueSnapshot>, IssueError>
where
    I: GitHubInterpreter,
    I::Error: Display,
{
    match execute(github, GitHubEffect::ListOpenIssues, false).await? {
        Some(GitHubResponse::Issues(issues)) => Ok(issues),
        other => Err(IssueError::UnexpectedResponse {
            effect: "list_open_issues",
            response: format!("{other:?}"),
        }),
    }
}

//! GitHub webhook payload parser.
//!
//! Parses raw webhook JSON payloads into typed [`WebhookEvent`] values.
//!
//! 1. The event type is determined from the `X-GitHub-Event` header
//! 2. The payload is parsed according to the event type
//! 3. Unsupported event types return `Ok(None)`
//! 4. Malformed payloads return `Err` with details

use serde::Deserialize;
use thiserror::Error;

use crate::types::{IssueSnapshot, RepoId};

use super::events::{IssueAction, IssuesEvent, PingEvent, WebhookEvent};

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Parses a webhook payload into a typed event.
///
/// # Returns
///
/// * `Ok(Some(event))` - Successfully parsed a supported event type
/// * `Ok(None)` - Unsupported event type
/// * `Err(e)` - Malformed payload or missing required fields
///
/// # Examples
///
/// ```
/// use ghia::webhooks::{WebhookEvent, parse_webhook};
///
/// let payload = br#"{"hook_id": 7, "repository": {"full_name": "octocat/hello"}}"#;
/// let event = parse_webhook("ping", payload).unwrap();
/// assert!(matches!(event, Some(WebhookEvent::Ping(_))));
///
/// assert!(parse_webhook("push", b"{}").unwrap().is_none());
/// ```
pub fn parse_webhook(event_type: &str, payload: &[u8]) -> Result<Option<WebhookEvent>, ParseError> {
    match event_type {
        "ping" => parse_ping(payload).map(|e| Some(WebhookEvent::Ping(e))),
        "issues" => parse_issues(payload).map(|e| Some(WebhookEvent::Issues(e))),
        _ => Ok(None),
    }
}

// ============================================================================
// Raw payload structures for deserialization
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRepository {
    owner: RawUser,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
}

// ============================================================================
// ping event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawPingPayload {
    hook_id: u64,
    repository: RawPingRepository,
}

#[derive(Debug, Deserialize)]
struct RawPingRepository {
    full_name: String,
}

fn parse_ping(payload: &[u8]) -> Result<PingEvent, ParseError> {
    let raw: RawPingPayload = serde_json::from_slice(payload)?;
    Ok(PingEvent {
        hook_id: raw.hook_id,
        repo_full_name: raw.repository.full_name,
    })
}

// ============================================================================
// issues event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawIssuesPayload {
    action: String,
    issue: RawIssue,
    repository: RawRepository,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    number: u64,
    html_url: String,
    title: String,
    body: Option<String>,
    state: String,
    #[serde(default)]
    labels: Vec<RawLabel>,
    #[serde(default)]
    assignees: Vec<RawUser>,
}

fn parse_issues(payload: &[u8]) -> Result<IssuesEvent, ParseError> {
    let raw: RawIssuesPayload = serde_json::from_slice(payload)?;
    let issue = raw.issue;
    Ok(IssuesEvent {
        action: IssueAction::parse(&raw.action),
        repo: RepoId::new(raw.repository.owner.login, raw.repository.name),
        is_open: issue.state == "open",
        issue: IssueSnapshot::new(issue.number, issue.html_url, issue.title)
            .with_body(issue.body)
            .with_labels(issue.labels.into_iter().map(|l| l.name))
            .with_assignees(issue.assignees.into_iter().map(|u| u.login)),
    })
}

//! Webhook endpoint handler.
//!
//! Accepts GitHub webhook deliveries, validates signatures, and runs
//! assignment for the issue an `issues` event describes. Processing happens
//! inline; the response carries the issue's report.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{AppState, RepoClients};
use crate::runner::process_issue;
use crate::webhooks::{
    ParseError, SUPPORTED_EVENTS, SignatureAlgorithm, WebhookEvent, parse_webhook,
    verify_signature,
};

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";

/// Errors that can occur when processing a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing or invalid signature while a secret is configured.
    #[error("invalid signature")]
    InvalidSignature,

    #[error("event {0:?} not supported (supported: {supported})", supported = SUPPORTED_EVENTS.join(", "))]
    UnsupportedEvent(String),

    /// Payload is not JSON or lacks required fields.
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] ParseError),

    #[error("could not update issue {issue}: {message}")]
    ProcessingFailed { issue: String, message: String },
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::UnsupportedEvent(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WebhookError::ProcessingFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Headers:
///   - `X-GitHub-Event`: `issues` or `ping`
///   - `X-Hub-Signature-256` or `X-Hub-Signature`: required when a secret is
///     configured
/// - Body: JSON webhook payload
///
/// # Response
///
/// - 200 `PONG` for pings
/// - 200 with the issue report as JSON for processed issues
/// - 200 `skipped` for closed issues and actions that don't affect assignment
/// - 400 Bad Request: Unsupported event
/// - 401 Unauthorized: Invalid signature
/// - 422 Unprocessable Entity: Malformed payload
/// - 500 Internal Server Error: GitHub rejected an update
pub async fn webhook_handler<C: RepoClients>(
    State(app_state): State<AppState<C>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookError> {
    if let Some(secret) = app_state.webhook_secret()
        && !signature_matches(&headers, &body, secret)
    {
        warn!("Invalid webhook signature");
        return Err(WebhookError::InvalidSignature);
    }

    let event_type = get_header(&headers, HEADER_EVENT).unwrap_or_default();
    debug!(event_type = %event_type, "Received webhook");

    let Some(event) = parse_webhook(&event_type, &body)? else {
        return Err(WebhookError::UnsupportedEvent(event_type));
    };

    match event {
        WebhookEvent::Ping(ping) => {
            info!(repo = %ping.repo_full_name, hook_id = ping.hook_id, "Received ping");
            Ok((StatusCode::OK, "PONG").into_response())
        }
        WebhookEvent::Issues(event) => {
            if !event.should_process() {
                debug!(
                    repo = %event.repo,
                    issue = %event.issue.number,
                    action = event.action.as_str(),
                    open = event.is_open,
                    "Skipping issue event"
                );
                return Ok((StatusCode::OK, "skipped").into_response());
            }

            let github = app_state.clients().for_repo(&event.repo);
            let report = process_issue(&github, &event.repo, &event.issue, app_state.config()).await;
            match report.error {
                None => Ok(Json(report).into_response()),
                Some(message) => Err(WebhookError::ProcessingFailed {
                    issue: report.issue_ref,
                    message,
                }),
            }
        }
    }
}

/// Checks the first signature header present, preferring SHA-256.
fn signature_matches(headers: &HeaderMap, body: &[u8], secret: &[u8]) -> bool {
    SignatureAlgorithm::ALL
        .into_iter()
        .find_map(|algorithm| {
            get_header(headers, algorithm.header_name()).map(|header| (algorithm, header))
        })
        .is_some_and(|(algorithm, header)| verify_signature(algorithm, body, &header, secret))
}

/// Extracts a header value as a string.
fn get_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhooks::{compute_signature, format_signature_header};

    fn signed(algorithm: SignatureAlgorithm, body: &[u8], secret: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let header = format_signature_header(algorithm, &compute_signature(algorithm, body, secret).unwrap());
        headers.insert(algorithm.header_name(), header.parse().unwrap());
        headers
    }

    #[test]
    fn get_header_present() {
        let mut headers = HeaderMap::new();
        headers.insert("x-github-event", "issues".parse().unwrap());

        assert_eq!(get_header(&headers, "x-github-event").as_deref(), Some("issues"));
    }

    #[test]
    fn get_header_missing() {
        assert!(get_header(&HeaderMap::new(), "x-github-event").is_none());
    }

    #[test]
    fn either_signature_header_is_accepted() {
        for algorithm in SignatureAlgorithm::ALL {
            let headers = signed(algorithm, b"{}", b"secret");
            assert!(signature_matches(&headers, b"{}", b"secret"));
            assert!(!signature_matches(&headers, b"{}", b"other"));
        }
    }

    #[test]
    fn sha256_header_takes_precedence() {
        let mut headers = signed(SignatureAlgorithm::Sha1, b"{}", b"secret");
        headers.insert(
            SignatureAlgorithm::Sha256.header_name(),
            "sha256=00".parse().unwrap(),
        );
        assert!(!signature_matches(&headers, b"{}", b"secret"));
    }

    #[test]
    fn missing_signature_does_not_match() {
        assert!(!signature_matches(&HeaderMap::new(), b"{}", b"secret"));
    }

    #[test]
    fn unsupported_event_lists_supported_ones() {
        let err = WebhookError::UnsupportedEvent("push".into());
        assert_eq!(
            err.to_string(),
            "event \"push\" not supported (supported: issues, ping)"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_status_codes() {
        assert_eq!(
            WebhookError::InvalidSignature.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        let parse = parse_webhook("ping", b"{}").unwrap_err();
        assert_eq!(
            WebhookError::from(parse).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let failed = WebhookError::ProcessingFailed {
            issue: "o/r#1".into(),
            message: "boom".into(),
        };
        assert_eq!(
            failed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

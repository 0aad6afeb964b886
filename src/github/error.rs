//! GitHub API error types.

use std::fmt;
use thiserror::Error;

/// A failed GitHub API call.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    /// The HTTP status code, if available.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl GitHubApiError {
    /// Wraps an octocrab error, keeping GitHub's own message when there is one.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let (status_code, message) = match &err {
            octocrab::Error::GitHub { source, .. } => {
                (Some(source.status_code.as_u16()), source.message.clone())
            }
            other => {
                let message = other.to_string();
                (status_code_from_message(&message), message)
            }
        };
        Self {
            status_code,
            message,
            source: Some(err),
        }
    }

    /// Whether GitHub rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == Some(401)
    }
}

/// Extracts an HTTP status code from an error message, if one is present.
///
/// Only used for octocrab errors that do not carry a structured GitHub
/// response, such as transport failures that mention the status in text.
pub fn status_code_from_message(message: &str) -> Option<u16> {
    if let Some(idx) = message.find("status: ") {
        let digits: String = message[idx + 8..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if let Ok(code) = digits.parse() {
            return Some(code);
        }
    }

    let lower = message.to_lowercase();
    [
        (401, "unauthorized"),
        (403, "forbidden"),
        (404, "not found"),
        (410, "gone"),
        (422, "unprocessable"),
    ]
    .into_iter()
    .find(|&(code, phrase)| message.contains(&code.to_string()) && lower.contains(phrase))
    .map(|(code, _)| code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_from_status_field() {
        assert_eq!(status_code_from_message("request failed, status: 502 Bad"), Some(502));
        assert_eq!(status_code_from_message("status: 404"), Some(404));
    }

    #[test]
    fn status_code_from_well_known_phrases() {
        assert_eq!(status_code_from_message("404 Not Found"), Some(404));
        assert_eq!(status_code_from_message("HTTP 401 Unauthorized"), Some(401));
        assert_eq!(status_code_from_message("410 Gone: issues disabled"), Some(410));
    }

    #[test]
    fn no_status_code_in_plain_message() {
        assert_eq!(status_code_from_message("connection reset by peer"), None);
        assert_eq!(status_code_from_message("status: abc"), None);
        // A bare number without its phrase is not trusted.
        assert_eq!(status_code_from_message("issue 404 was closed"), None);
    }

    #[test]
    fn display_includes_status() {
        let err = GitHubApiError {
            status_code: Some(403),
            message: "Resource not accessible".into(),
            source: None,
        };
        assert_eq!(
            err.to_string(),
            "GitHub API error (HTTP 403): Resource not accessible"
        );
        let err = GitHubApiError {
            status_code: None,
            message: "boom".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "GitHub API error: boom");
    }

    #[test]
    fn unauthorized_detection() {
        let mut err = GitHubApiError {
            status_code: None,
            message: "Bad credentials".into(),
            source: None,
        };
        assert!(!err.is_unauthorized());
        err.status_code = Some(401);
        assert!(err.is_unauthorized());
    }
}

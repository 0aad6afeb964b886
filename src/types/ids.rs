//! Newtype wrappers for domain identifiers.
//!
//! These keep issue numbers and repository slugs from being passed around as
//! bare integers and strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An issue number within a repository.
///
/// GitHub numbers issues and pull requests from the same sequence, so this
/// also identifies pull requests returned by the issues API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(pub u64);

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error returned when a repository slug is not `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not in owner/repository format: {0:?}")]
pub struct InvalidRepoSlug(pub String);

/// A repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Returns the `owner/repo#N` reference for an issue in this repository.
    pub fn issue_ref(&self, number: IssueNumber) -> String {
        format!("{}{}", self, number)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = InvalidRepoSlug;

    /// Parses `owner/repo`. Exactly one `/` is allowed and neither side may be
    /// empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
                Ok(RepoId::new(owner, repo))
            }
            _ => Err(InvalidRepoSlug(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod issue_number {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_format(n: u64) {
                prop_assert_eq!(format!("{}", IssueNumber(n)), format!("#{}", n));
            }

            #[test]
            fn ordering_matches_underlying(a: u64, b: u64) {
                prop_assert_eq!(IssueNumber(a).cmp(&IssueNumber(b)), a.cmp(&b));
            }
        }
    }

    mod repo_id {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_then_parse(
                owner in "[a-zA-Z][a-zA-Z0-9-]{0,38}",
                repo in "[a-zA-Z][a-zA-Z0-9_.-]{0,99}"
            ) {
                let id = RepoId::new(&owner, &repo);
                let parsed: RepoId = id.to_string().parse().unwrap();
                prop_assert_eq!(parsed, id);
            }
        }

        #[test]
        fn parses_owner_and_repo() {
            let id: RepoId = "octocat/hello-world".parse().unwrap();
            assert_eq!(id.owner, "octocat");
            assert_eq!(id.repo, "hello-world");
        }

        #[test]
        fn rejects_malformed_slugs() {
            for slug in ["", "octocat", "octocat/", "/hello", "a/b/c", "octocat//x"] {
                assert_eq!(
                    slug.parse::<RepoId>(),
                    Err(InvalidRepoSlug(slug.to_string())),
                    "slug {slug:?} should be rejected"
                );
            }
        }

        #[test]
        fn issue_ref_format() {
            let id = RepoId::new("octocat", "hello-world");
            assert_eq!(id.issue_ref(IssueNumber(7)), "octocat/hello-world#7");
        }

        #[test]
        fn invalid_slug_message() {
            let err = "nope".parse::<RepoId>().unwrap_err();
            assert!(err.to_string().contains("not in owner/repository format"));
        }
    }
}

//! Effects-as-data for GitHub operations.
//!
//! The engine describes the API calls it wants as [`GitHubEffect`] values and
//! hands them to a [`GitHubInterpreter`]. The octocrab client is one
//! interpreter; tests use recording mocks.

pub mod github;
pub mod interpreter;

pub use github::{GitHubEffect, GitHubResponse, UserData};
pub use interpreter::GitHubInterpreter;

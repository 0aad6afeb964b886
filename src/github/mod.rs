//! GitHub API client and effect interpreter.
//!
//! This module executes GitHub effects via the octocrab library. It implements
//! the `GitHubInterpreter` trait defined in the effects module. Failures are
//! returned to the caller as they happen; nothing is retried here.

mod client;
mod error;
mod interpreter;

pub use client::{OctocrabClient, build_octocrab};
pub use error::GitHubApiError;
pub use interpreter::{fetch_authenticated_user, interpret_github_effect};

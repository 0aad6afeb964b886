//! Core domain types shared by the engine, the GitHub client and the server.

pub mod ids;
pub mod issue;

pub use ids::{InvalidRepoSlug, IssueNumber, RepoId};
pub use issue::IssueSnapshot;

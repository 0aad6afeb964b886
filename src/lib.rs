//! GHIA - GitHub Issues Auto-Assigner.
//!
//! Assigns GitHub issues to users whose regex rules match the issue's title,
//! body or labels, and labels issues nobody matched. Runs once over a
//! repository's open issues from the command line, or per issue as a webhook
//! receiver.

pub mod config;
pub mod effects;
pub mod github;
pub mod reconcile;
pub mod report;
pub mod rules;
pub mod runner;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub mod test_utils;

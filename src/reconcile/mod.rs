//! Reconciliation of matched assignees against an issue's current state.
//!
//! Everything here is pure: the functions compute plans and decisions and
//! describe the API calls to make as [`GitHubEffect`](crate::effects::GitHubEffect)
//! values. The runner decides whether to execute them.

pub mod fallback;
pub mod plan;
pub mod strategy;

pub use fallback::{FallbackConfig, FallbackDecision, decide_fallback};
pub use plan::{AssigneeStatus, OperationPlan, reconcile};
pub use strategy::{Strategy, UnknownStrategy};

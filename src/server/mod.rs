//! HTTP server for webhook-driven assignment.
//!
//! # Endpoints
//!
//! - `POST /` - Accepts GitHub webhook deliveries and assigns the affected issue
//! - `GET /` - Returns the authenticated user and the configured rules as JSON
//! - `GET /health` - Returns 200 if server is running

use std::fmt::Display;
use std::sync::Arc;

use octocrab::Octocrab;

use crate::effects::{GitHubInterpreter, UserData};
use crate::github::OctocrabClient;
use crate::runner::AssignmentConfig;
use crate::types::RepoId;

pub mod pages;
pub mod webhook;

pub use pages::{health_handler, info_handler};
pub use webhook::{WebhookError, webhook_handler};

/// Hands out GitHub interpreters scoped to the repository a webhook names.
pub trait RepoClients: Send + Sync + 'static {
    type Interpreter: GitHubInterpreter<Error: Display + Send> + Send + Sync;

    fn for_repo(&self, repo: &RepoId) -> Self::Interpreter;
}

/// Octocrab-backed clients sharing one authenticated connection.
#[derive(Clone)]
pub struct GitHubClients {
    octocrab: Octocrab,
}

impl GitHubClients {
    pub fn new(octocrab: Octocrab) -> Self {
        GitHubClients { octocrab }
    }
}

impl RepoClients for GitHubClients {
    type Interpreter = OctocrabClient;

    fn for_repo(&self, repo: &RepoId) -> OctocrabClient {
        OctocrabClient::new(self.octocrab.clone(), repo.clone())
    }
}

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor.
pub struct AppState<C> {
    inner: Arc<AppStateInner<C>>,
}

struct AppStateInner<C> {
    clients: C,

    /// Rules, strategy, fallback and dry-run flag applied to every issue.
    config: AssignmentConfig,

    /// Webhook secret for signature verification. `None` accepts unsigned
    /// deliveries.
    webhook_secret: Option<Vec<u8>>,

    /// The user the GitHub token belongs to, fetched at startup.
    user: UserData,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: RepoClients> AppState<C> {
    pub fn new(
        clients: C,
        config: AssignmentConfig,
        webhook_secret: Option<Vec<u8>>,
        user: UserData,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                clients,
                config,
                webhook_secret,
                user,
            }),
        }
    }

    pub fn clients(&self) -> &C {
        &self.inner.clients
    }

    pub fn config(&self) -> &AssignmentConfig {
        &self.inner.config
    }

    pub fn webhook_secret(&self) -> Option<&[u8]> {
        self.inner.webhook_secret.as_deref()
    }

    pub fn user(&self) -> &UserData {
        &self.inner.user
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<C: RepoClients>(app_state: AppState<C>) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/", get(info_handler::<C>).post(webhook_handler::<C>))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
